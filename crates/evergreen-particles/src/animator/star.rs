//! The top star and its halo

use super::InstanceState;
use crate::formation;
use crate::record::ParticleRecord;
use evergreen_core::{Color, Transform, Vec3};
use evergreen_runtime::{FrameContext, SceneSystem};
use std::f32::consts::{FRAC_PI_2, TAU};

const TREE_SPIN: f32 = 0.8;
const SCATTERED_SPIN: f32 = 3.0;
const BOB_AMPLITUDE: f32 = 0.05;
const BOB_FREQUENCY: f32 = 1.5;
const HALO_SCALE: f32 = 6.0;

/// Additive glow sprite drawn around the star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloState {
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

/// Single star easing between the treetop and a raised point
pub struct StarAnimator {
    record: ParticleRecord,
    /// Eased position, without the bob
    position: Vec3,
    yaw: f32,
    scale: f32,
    instance: InstanceState,
    halo: HaloState,
}

impl Default for StarAnimator {
    fn default() -> Self {
        Self::new(formation::star_record())
    }
}

impl StarAnimator {
    /// Star easing between `record.targets.tree` and `record.targets.scatter`
    pub fn new(record: ParticleRecord) -> Self {
        let start = record.origin;
        let scale = record.scale;
        Self {
            instance: InstanceState {
                transform: Transform::from_position(start).with_uniform_scale(scale),
                color: record.color,
            },
            halo: HaloState {
                position: start,
                scale: scale * HALO_SCALE,
                opacity: 0.7,
            },
            position: start,
            yaw: 0.0,
            scale,
            record,
        }
    }

    pub fn color(&self) -> Color {
        self.record.color
    }

    pub fn record(&self) -> &ParticleRecord {
        &self.record
    }

    pub fn update(&mut self, frame: &FrameContext) {
        let dt = frame.delta;
        let t = frame.elapsed;
        let (target, spin, target_scale) = if frame.is_tree() {
            (self.record.targets.tree, TREE_SPIN, self.record.scale)
        } else {
            (self.record.targets.scatter, SCATTERED_SPIN, self.record.scale * 0.6)
        };

        self.position.lerp_towards(&target, (dt * 2.0).min(1.0));
        self.yaw = (self.yaw + dt * spin) % TAU;
        self.scale += (target_scale - self.scale) * dt.min(1.0);

        // The bob only affects what is drawn so it never accumulates
        let mut drawn = self.position;
        drawn.y += (t * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;

        self.instance.transform = Transform::from_position(drawn)
            .with_rotation(Vec3::new(0.0, self.yaw, 0.0))
            .with_uniform_scale(self.scale);
        self.halo = HaloState {
            position: drawn,
            scale: self.scale * HALO_SCALE,
            opacity: 0.7 + (t * 2.0).sin() * 0.15,
        };
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn instance(&self) -> &InstanceState {
        &self.instance
    }

    pub fn halo(&self) -> &HaloState {
        &self.halo
    }
}

impl SceneSystem for StarAnimator {
    fn update(&mut self, frame: &FrameContext) {
        StarAnimator::update(self, frame);
    }

    fn name(&self) -> &str {
        "star"
    }
}

/// Closed outline of a star with `points` tips, first tip pointing down the -y axis
pub fn star_outline(points: usize, outer_radius: f32, inner_radius: f32) -> Vec<[f32; 2]> {
    let corners = points * 2;
    (0..corners)
        .map(|i| {
            let angle = i as f32 / corners as f32 * TAU - FRAC_PI_2;
            let r = if i % 2 == 0 { outer_radius } else { inner_radius };
            [angle.cos() * r, angle.sin() * r]
        })
        .collect()
}
