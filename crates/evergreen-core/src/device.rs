//! Coarse device classification

use serde::{Deserialize, Serialize};

/// Viewports narrower than this are treated as compact (phone-sized).
pub const COMPACT_WIDTH_THRESHOLD: u32 = 768;

/// Coarse device class supplied by the host.
///
/// Drives particle budgets and text layout. Formation data is regenerated
/// only when this value changes, never on exact viewport width.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Compact,
    #[default]
    Wide,
}

impl DeviceClass {
    pub fn from_viewport_width(width: u32) -> Self {
        if width < COMPACT_WIDTH_THRESHOLD {
            DeviceClass::Compact
        } else {
            DeviceClass::Wide
        }
    }

    pub fn from_compact_flag(is_compact: bool) -> Self {
        if is_compact {
            DeviceClass::Compact
        } else {
            DeviceClass::Wide
        }
    }

    pub fn is_compact(&self) -> bool {
        matches!(self, DeviceClass::Compact)
    }

    /// Pick the value for this class from a (compact, wide) pair
    pub fn pick<T: Copy>(&self, compact: T, wide: T) -> T {
        match self {
            DeviceClass::Compact => compact,
            DeviceClass::Wide => wide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_threshold() {
        assert_eq!(DeviceClass::from_viewport_width(767), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_viewport_width(768), DeviceClass::Wide);
        assert_eq!(DeviceClass::from_viewport_width(1920), DeviceClass::Wide);
    }

    #[test]
    fn pick_by_class() {
        assert_eq!(DeviceClass::Compact.pick(8000, 12000), 8000);
        assert_eq!(DeviceClass::Wide.pick(8000, 12000), 12000);
    }
}
