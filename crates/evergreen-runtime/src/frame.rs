//! Per-frame context

use crate::SceneMode;

/// Everything a system may read during one frame.
///
/// Built once at the start of the frame, so a mode change requested
/// mid-frame is seen by every system on the next frame, never torn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub mode: SceneMode,
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the scene started
    pub elapsed: f32,
}

impl FrameContext {
    pub fn new(mode: SceneMode, delta: f32, elapsed: f32) -> Self {
        Self {
            mode,
            delta,
            elapsed,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.mode == SceneMode::TreeShape
    }
}
