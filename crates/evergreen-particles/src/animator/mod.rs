//! Per-category animators
//!
//! One animator per particle category. Each owns the moving positions of its
//! particles and an instance buffer sized exactly to its records. Every tick
//! it reads the frame's scene mode, eases positions toward the matching
//! target and derives the drawn transform and color from immutable record data.

mod gifts;
mod looks;
mod ribbon;
mod star;

pub use gifts::GiftAnimator;
pub use looks::{DustLook, FairyLightLook, GiftLook, FoliageAnimator, LightAnimator, OrnamentAnimator};
pub use ribbon::{RibbonAnimator, RibbonMesh, RibbonPath, RibbonVertex};
pub use star::{star_outline, HaloState, StarAnimator};

use crate::motion::{self, MotionProfile};
use crate::record::{Category, FormationKind, ParticleRecord};
use evergreen_core::{Color, Transform, Vec3};
use evergreen_runtime::{FrameContext, SceneMode, SceneSystem};
use std::sync::Arc;

/// Drawn state of one particle slot for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceState {
    pub transform: Transform,
    pub color: Color,
}

impl InstanceState {
    pub fn hidden() -> Self {
        Self {
            transform: Transform::IDENTITY.with_uniform_scale(0.0),
            color: Color::BLACK,
        }
    }
}

/// Category-specific motion and appearance.
///
/// Both methods are pure functions of immutable record data, the eased
/// position and the frame, so the record's base color is never overwritten.
pub trait CategoryLook {
    fn profile(&self) -> MotionProfile;

    fn pose(&self, record: &ParticleRecord, position: Vec3, frame: &FrameContext) -> Transform;

    fn color_for(&self, record: &ParticleRecord, mode: SceneMode, time: f32) -> Color;
}

/// Eases a category's particles between its tree and dispersed targets
pub struct ParticleAnimator<L: CategoryLook> {
    category: Category,
    records: Arc<[ParticleRecord]>,
    positions: Vec<Vec3>,
    instances: Vec<InstanceState>,
    /// Which target the category heads for when not in tree mode
    dispersed: FormationKind,
    look: L,
}

impl<L: CategoryLook> ParticleAnimator<L> {
    pub fn new(
        category: Category,
        records: Arc<[ParticleRecord]>,
        dispersed: FormationKind,
        look: L,
    ) -> Self {
        let positions = records.iter().map(|r| r.origin).collect();
        let instances = records
            .iter()
            .map(|r| InstanceState {
                transform: Transform::from_position(r.origin),
                color: r.color,
            })
            .collect();
        Self {
            category,
            records,
            positions,
            instances,
            dispersed,
            look,
        }
    }

    /// Swap in regenerated records, sizing every buffer to the new count.
    ///
    /// Slots that exist in both generations keep their current position so
    /// motion stays continuous; new slots start at their record's origin.
    pub fn rebind(&mut self, records: Arc<[ParticleRecord]>) {
        let kept = self.positions.len().min(records.len());
        self.positions.truncate(kept);
        self.positions
            .extend(records[kept..].iter().map(|r| r.origin));

        self.instances.clear();
        self.instances.extend(self.positions.iter().zip(records.iter()).map(|(p, r)| {
            InstanceState {
                transform: Transform::from_position(*p),
                color: r.color,
            }
        }));

        log::debug!(
            "[particles] {} animator rebound to {} particles",
            self.category,
            records.len()
        );
        self.records = records;
    }

    pub fn update(&mut self, frame: &FrameContext) {
        let kind = if frame.is_tree() {
            FormationKind::Tree
        } else {
            self.dispersed
        };
        let toward_dispersed = kind != FormationKind::Tree;
        let profile = self.look.profile();

        for ((record, position), instance) in self
            .records
            .iter()
            .zip(self.positions.iter_mut())
            .zip(self.instances.iter_mut())
        {
            let target = record.targets.get(kind);
            motion::step(
                position,
                target,
                record.speed,
                frame.delta,
                &profile,
                toward_dispersed,
            );
            instance.transform = self.look.pose(record, *position, frame);
            instance.color = self.look.color_for(record, frame.mode, frame.elapsed);
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn instances(&self) -> &[InstanceState] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn look(&self) -> &L {
        &self.look
    }

    pub fn set_look(&mut self, look: L) {
        self.look = look;
    }

    /// Mean distance between the current positions and the given target kind
    pub fn mean_distance(&self, kind: FormationKind) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .records
            .iter()
            .zip(&self.positions)
            .map(|(r, p)| p.distance(&r.targets.get(kind)))
            .sum();
        total / self.records.len() as f32
    }
}

impl<L: CategoryLook> SceneSystem for ParticleAnimator<L> {
    fn update(&mut self, frame: &FrameContext) {
        ParticleAnimator::update(self, frame);
    }

    fn name(&self) -> &str {
        self.category.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FormationTargets;

    struct PlainLook;

    impl CategoryLook for PlainLook {
        fn profile(&self) -> MotionProfile {
            MotionProfile::new(4.0).with_soft_landing()
        }

        fn pose(&self, _: &ParticleRecord, position: Vec3, _: &FrameContext) -> Transform {
            Transform::from_position(position)
        }

        fn color_for(&self, record: &ParticleRecord, _: SceneMode, _: f32) -> Color {
            record.color
        }
    }

    fn record(id: u32, tree: Vec3, text: Vec3) -> ParticleRecord {
        ParticleRecord {
            id,
            targets: FormationTargets {
                tree,
                text,
                scatter: Vec3::new(0.0, 30.0, 0.0),
            },
            origin: tree,
            rotation: Vec3::ZERO,
            scale: 1.0,
            color: Color::from_hex(0x2D4F14),
            speed: 1.0,
        }
    }

    fn records(n: u32) -> Arc<[ParticleRecord]> {
        (0..n)
            .map(|i| record(i, Vec3::new(i as f32, 0.0, 0.0), Vec3::new(i as f32, 1.0, 0.0)))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn buffers_match_record_count() {
        let animator = ParticleAnimator::new(Category::Foliage, records(7), FormationKind::Text, PlainLook);
        assert_eq!(animator.positions().len(), 7);
        assert_eq!(animator.instances().len(), 7);
    }

    #[test]
    fn scattered_mode_heads_for_dispersed_target() {
        let mut animator =
            ParticleAnimator::new(Category::Foliage, records(3), FormationKind::Text, PlainLook);
        let frame = FrameContext::new(SceneMode::Scattered, 1.0 / 60.0, 0.0);
        for _ in 0..600 {
            animator.update(&frame);
        }
        assert!(animator.mean_distance(FormationKind::Text) <= 0.05);
        assert!(animator.mean_distance(FormationKind::Tree) > 0.9);
    }

    #[test]
    fn tree_mode_holds_position() {
        let mut animator =
            ParticleAnimator::new(Category::Foliage, records(3), FormationKind::Text, PlainLook);
        let frame = FrameContext::new(SceneMode::TreeShape, 0.1, 0.0);
        animator.update(&frame);
        assert_eq!(animator.mean_distance(FormationKind::Tree), 0.0);
    }

    #[test]
    fn rebind_shrinks_and_grows_exactly() {
        let mut animator =
            ParticleAnimator::new(Category::Foliage, records(5), FormationKind::Text, PlainLook);
        let frame = FrameContext::new(SceneMode::Scattered, 0.1, 0.0);
        animator.update(&frame);
        let moved = animator.positions()[1];

        animator.rebind(records(2));
        assert_eq!(animator.positions().len(), 2);
        assert_eq!(animator.instances().len(), 2);
        assert_eq!(animator.positions()[1], moved);

        animator.rebind(records(9));
        assert_eq!(animator.len(), 9);
        assert_eq!(animator.instances().len(), 9);
        assert_eq!(animator.positions()[8], Vec3::new(8.0, 0.0, 0.0));
        animator.update(&frame);
    }

    #[test]
    fn empty_category_is_fine() {
        let mut animator =
            ParticleAnimator::new(Category::Light, records(0), FormationKind::Text, PlainLook);
        animator.update(&FrameContext::new(SceneMode::Scattered, 0.1, 1.0));
        assert!(animator.is_empty());
        assert_eq!(animator.mean_distance(FormationKind::Text), 0.0);
    }
}
