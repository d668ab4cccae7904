//! Scene mode and the per-frame mode latch

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single discrete scene state broadcast to every animator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneMode {
    /// Particles form the tree
    #[default]
    TreeShape,
    /// Particles leave the tree: text formation or scatter, per category
    Scattered,
}

impl SceneMode {
    pub fn toggled(self) -> Self {
        match self {
            SceneMode::TreeShape => SceneMode::Scattered,
            SceneMode::Scattered => SceneMode::TreeShape,
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneMode::TreeShape => write!(f, "TREE_SHAPE"),
            SceneMode::Scattered => write!(f, "SCATTERED"),
        }
    }
}

/// Holds the host-requested mode separately from the mode of the running frame.
///
/// The host may call `request` at any time; `latch` is called once at the
/// start of each frame and is the only place the active mode changes.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitch {
    active: SceneMode,
    requested: SceneMode,
}

impl ModeSwitch {
    pub fn new(initial: SceneMode) -> Self {
        Self {
            active: initial,
            requested: initial,
        }
    }

    /// Request a mode; takes effect at the next `latch`.
    pub fn request(&mut self, mode: SceneMode) {
        self.requested = mode;
    }

    /// Request the opposite of the most recently requested mode.
    pub fn toggle(&mut self) {
        self.requested = self.requested.toggled();
    }

    /// Apply the pending request. Returns `Some((from, to))` when the mode changed.
    pub fn latch(&mut self) -> Option<(SceneMode, SceneMode)> {
        if self.requested == self.active {
            return None;
        }
        let from = self.active;
        self.active = self.requested;
        log::info!("[runtime] Scene mode {from} -> {}", self.active);
        Some((from, self.active))
    }

    pub fn active(&self) -> SceneMode {
        self.active
    }

    pub fn requested(&self) -> SceneMode {
        self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips() {
        assert_eq!(SceneMode::TreeShape.toggled(), SceneMode::Scattered);
        assert_eq!(SceneMode::Scattered.toggled(), SceneMode::TreeShape);
    }

    #[test]
    fn request_is_deferred_until_latch() {
        let mut switch = ModeSwitch::new(SceneMode::TreeShape);
        switch.request(SceneMode::Scattered);
        assert_eq!(switch.active(), SceneMode::TreeShape);

        let change = switch.latch();
        assert_eq!(change, Some((SceneMode::TreeShape, SceneMode::Scattered)));
        assert_eq!(switch.active(), SceneMode::Scattered);
        assert_eq!(switch.latch(), None);
    }

    #[test]
    fn double_toggle_within_frame_is_no_change() {
        let mut switch = ModeSwitch::new(SceneMode::TreeShape);
        switch.toggle();
        switch.toggle();
        assert_eq!(switch.latch(), None);
        assert_eq!(switch.active(), SceneMode::TreeShape);
    }

    #[test]
    fn display_matches_host_names() {
        assert_eq!(SceneMode::TreeShape.to_string(), "TREE_SHAPE");
        assert_eq!(SceneMode::Scattered.to_string(), "SCATTERED");
    }
}
