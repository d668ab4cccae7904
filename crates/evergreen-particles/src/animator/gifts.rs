//! Gift boxes and their lids

use super::looks::GiftLook;
use super::{InstanceState, ParticleAnimator};
use crate::record::{Category, FormationKind, ParticleRecord};
use evergreen_core::{Color, Transform, Vec3};
use evergreen_runtime::{FrameContext, SceneSystem};
use std::sync::Arc;

const LID_COLOR: u32 = 0xFFD700;

/// Gift bodies plus a second instance buffer of flat gold lids.
///
/// Gifts never form text: their dispersed target is the scatter sphere,
/// and both bodies and lids collapse to zero scale while scattered.
pub struct GiftAnimator {
    bodies: ParticleAnimator<GiftLook>,
    lids: Vec<InstanceState>,
}

impl GiftAnimator {
    pub fn new(records: Arc<[ParticleRecord]>) -> Self {
        let bodies = ParticleAnimator::new(Category::Gift, records, FormationKind::Scatter, GiftLook);
        let lids = vec![InstanceState::hidden(); bodies.len()];
        Self { bodies, lids }
    }

    pub fn rebind(&mut self, records: Arc<[ParticleRecord]>) {
        self.bodies.rebind(records);
        self.lids = vec![InstanceState::hidden(); self.bodies.len()];
    }

    pub fn update(&mut self, frame: &FrameContext) {
        self.bodies.update(frame);
        let lid_color = Color::from_hex(LID_COLOR);

        for ((lid, body), record) in self
            .lids
            .iter_mut()
            .zip(self.bodies.instances())
            .zip(self.bodies.records())
        {
            *lid = if frame.is_tree() {
                lid_pose(body.transform, record.scale, lid_color)
            } else {
                InstanceState {
                    transform: body.transform.with_uniform_scale(0.0),
                    color: lid_color,
                }
            };
        }
    }

    pub fn bodies(&self) -> &[InstanceState] {
        self.bodies.instances()
    }

    pub fn lids(&self) -> &[InstanceState] {
        &self.lids
    }

    pub fn animator(&self) -> &ParticleAnimator<GiftLook> {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// A thin slab sitting on top of the box
fn lid_pose(body: Transform, scale: f32, color: Color) -> InstanceState {
    let mut transform = body;
    transform.position.y += 0.5 * scale;
    transform.scale = Vec3::new(scale * 1.05, scale * 0.1, scale * 1.05);
    InstanceState { transform, color }
}

impl SceneSystem for GiftAnimator {
    fn update(&mut self, frame: &FrameContext) {
        GiftAnimator::update(self, frame);
    }

    fn name(&self) -> &str {
        "gifts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::{generate_gifts, palette, FormationParams, GIFT_PALETTE};
    use crate::rand::ParticleRng;
    use evergreen_runtime::SceneMode;

    fn gifts(count: usize) -> Arc<[ParticleRecord]> {
        let mut rng = ParticleRng::new(25);
        generate_gifts(
            count,
            &palette(&GIFT_PALETTE),
            &FormationParams::for_category(Category::Gift),
            &mut rng,
        )
        .into()
    }

    #[test]
    fn lids_sit_on_boxes_in_tree() {
        let mut animator = GiftAnimator::new(gifts(25));
        animator.update(&FrameContext::new(SceneMode::TreeShape, 0.016, 0.0));

        assert_eq!(animator.lids().len(), 25);
        for ((lid, body), record) in animator
            .lids()
            .iter()
            .zip(animator.bodies())
            .zip(animator.animator().records())
        {
            assert!((lid.transform.position.y - body.transform.position.y - 0.5 * record.scale).abs() < 1e-5);
            assert!((lid.transform.scale.y - record.scale * 0.1).abs() < 1e-6);
            assert_eq!(lid.color, Color::from_hex(LID_COLOR));
        }
    }

    #[test]
    fn scattered_gifts_never_render_a_box() {
        let mut animator = GiftAnimator::new(gifts(25));
        let mut elapsed = 0.0;
        for _ in 0..120 {
            elapsed += 1.0 / 60.0;
            animator.update(&FrameContext::new(SceneMode::Scattered, 1.0 / 60.0, elapsed));
            assert!(animator.bodies().iter().all(|b| b.transform.is_hidden()));
            assert!(animator.lids().iter().all(|l| l.transform.is_hidden()));
        }
        // Still travelling toward the scatter sphere, not teleported
        assert!(animator.animator().mean_distance(FormationKind::Scatter) > 0.0);
    }

    #[test]
    fn rebind_resizes_lids() {
        let mut animator = GiftAnimator::new(gifts(25));
        animator.rebind(gifts(10));
        assert_eq!(animator.len(), 10);
        assert_eq!(animator.lids().len(), 10);
    }
}
