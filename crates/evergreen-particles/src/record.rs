//! Particle records: the immutable per-particle data produced by formation generators

use evergreen_core::{Color, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Particle category. Each category has its own generator and animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Foliage,
    Ornament,
    Light,
    Gift,
    Star,
    Ribbon,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Foliage => "foliage",
            Category::Ornament => "ornament",
            Category::Light => "light",
            Category::Gift => "gift",
            Category::Star => "star",
            Category::Ribbon => "ribbon",
        }
    }

    /// Categories whose dispersed target is a point of the text formation
    pub fn forms_text(&self) -> bool {
        matches!(self, Category::Foliage | Category::Ornament | Category::Light)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which stored target a particle heads for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormationKind {
    Tree,
    Text,
    Scatter,
}

/// Every target position a particle may be asked to reach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationTargets {
    pub tree: Vec3,
    /// Point in the text cloud. Zero for categories that never form text.
    pub text: Vec3,
    /// Point in the explosion sphere
    pub scatter: Vec3,
}

impl FormationTargets {
    pub fn get(&self, kind: FormationKind) -> Vec3 {
        match kind {
            FormationKind::Tree => self.tree,
            FormationKind::Text => self.text,
            FormationKind::Scatter => self.scatter,
        }
    }
}

/// One simulated particle, generated once and never mutated.
///
/// The moving position lives in the owning animator, seeded from `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    /// Stable index within the category, used as a phase seed for periodic motion
    pub id: u32,
    pub targets: FormationTargets,
    /// Position the particle starts from
    pub origin: Vec3,
    /// Static Euler rotation in radians
    pub rotation: Vec3,
    pub scale: f32,
    pub color: Color,
    /// Individual easing speed coefficient
    pub speed: f32,
}

impl ParticleRecord {
    /// Phase offset for sinusoidal motion
    pub fn phase(&self) -> f32 {
        self.id as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_select_by_kind() {
        let targets = FormationTargets {
            tree: Vec3::new(1.0, 0.0, 0.0),
            text: Vec3::new(0.0, 1.0, 0.0),
            scatter: Vec3::new(0.0, 0.0, 1.0),
        };
        assert_eq!(targets.get(FormationKind::Tree), targets.tree);
        assert_eq!(targets.get(FormationKind::Text), targets.text);
        assert_eq!(targets.get(FormationKind::Scatter), targets.scatter);
    }

    #[test]
    fn text_categories() {
        assert!(Category::Foliage.forms_text());
        assert!(Category::Light.forms_text());
        assert!(!Category::Gift.forms_text());
        assert!(!Category::Star.forms_text());
    }
}
