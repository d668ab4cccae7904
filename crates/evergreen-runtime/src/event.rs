//! Scene events

use crate::SceneMode;
use evergreen_core::DeviceClass;

/// Events emitted by the scene for the host to observe
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The active mode changed at the start of a frame
    ModeChanged { from: SceneMode, to: SceneMode },
    /// The host reported a new device class
    DeviceClassChanged { from: DeviceClass, to: DeviceClass },
    /// Formation data was regenerated; `particles` is the total across categories
    FormationsRebuilt {
        device: DeviceClass,
        particles: usize,
    },
    /// A firework batch was activated
    FireworkLaunched { batch: usize },
}
