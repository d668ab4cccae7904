//! Scene system trait

use crate::FrameContext;

/// A system ticked once per frame by the scene scheduler.
///
/// Systems run in registration order inside one synchronous frame callback.
/// Each system owns its own buffers and reads only the shared frame context,
/// so no system ever waits on another.
pub trait SceneSystem {
    /// Advance one frame. Must not block.
    fn update(&mut self, frame: &FrameContext);

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
