//! Appearance of the particle categories: needles, ornaments, fairy lights, gifts

use super::{CategoryLook, ParticleAnimator};
use crate::motion::MotionProfile;
use crate::record::ParticleRecord;
use evergreen_core::{Color, DeviceClass, Transform, Vec3};
use evergreen_runtime::{FrameContext, SceneMode};

pub type FoliageAnimator = ParticleAnimator<DustLook>;
pub type OrnamentAnimator = ParticleAnimator<DustLook>;
pub type LightAnimator = ParticleAnimator<FairyLightLook>;

/// Lerp rate used to pull arrived particles onto sharp glyph positions
const TEXT_SETTLE_RATE: f32 = 0.1;

const DUST_SIZE: f32 = 0.08;
const DUST_BOOST: f32 = 1.5;
const DUST_BREATH: f32 = 0.02;
const SWAY_AMPLITUDE: f32 = 0.02;

/// Needles and ornaments: static pose in the tree, glowing gold dust in text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustLook {
    /// Instance scale multiplier for this device class
    pub draw_scale: f32,
    /// Sway frequency while in the tree, if the category sways
    pub sway: Option<f32>,
    pub swirl: f32,
}

impl DustLook {
    pub fn foliage(device: DeviceClass) -> Self {
        Self {
            draw_scale: device.pick(0.35, 0.28),
            sway: Some(1.0),
            swirl: 1.5,
        }
    }

    pub fn ornaments(device: DeviceClass) -> Self {
        Self {
            draw_scale: device.pick(0.45, 0.35),
            sway: None,
            swirl: 1.5,
        }
    }

    pub fn text_color() -> Color {
        Color::from_hex(0xFFF5D0).scaled(1.5)
    }
}

impl CategoryLook for DustLook {
    fn profile(&self) -> MotionProfile {
        MotionProfile::new(4.0)
            .with_swirl(self.swirl)
            .with_soft_landing()
            .with_settle(TEXT_SETTLE_RATE)
    }

    fn pose(&self, record: &ParticleRecord, position: Vec3, frame: &FrameContext) -> Transform {
        let t = frame.elapsed;
        let phase = record.phase();

        if frame.is_tree() {
            let mut rotation = record.rotation;
            if let Some(speed) = self.sway {
                rotation.z += (t * speed + phase).sin() * SWAY_AMPLITUDE;
                rotation.x += (t * speed + phase).cos() * SWAY_AMPLITUDE;
            }
            return Transform::from_position(position)
                .with_rotation(rotation)
                .with_uniform_scale(self.draw_scale * record.scale);
        }

        let breathing = Vec3::new(
            (t * 1.5 + phase).sin() * DUST_BREATH,
            (t + phase).cos() * DUST_BREATH,
            0.0,
        );
        let tumble = Vec3::new(t, t, 0.0);
        let twinkle = 0.8 + (t * 5.0 + phase).sin() * 0.2;
        Transform::from_position(position + breathing)
            .with_rotation(record.rotation + tumble)
            .with_uniform_scale(self.draw_scale * DUST_SIZE * twinkle * DUST_BOOST)
    }

    fn color_for(&self, record: &ParticleRecord, mode: SceneMode, _time: f32) -> Color {
        match mode {
            SceneMode::TreeShape => record.color,
            SceneMode::Scattered => Self::text_color(),
        }
    }
}

/// Fairy lights: twinkling bulbs in the tree, white sparkles in the text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FairyLightLook;

impl FairyLightLook {
    const TREE_SIZE: f32 = 0.15;
    const TEXT_SIZE: f32 = 0.08;
    const JITTER: f32 = 0.05;

    pub fn text_color() -> Color {
        Color::WHITE.scaled(2.0)
    }
}

impl CategoryLook for FairyLightLook {
    fn profile(&self) -> MotionProfile {
        MotionProfile::new(4.5)
            .with_swirl(2.0)
            .with_soft_landing()
            .with_settle(TEXT_SETTLE_RATE)
    }

    fn pose(&self, record: &ParticleRecord, position: Vec3, frame: &FrameContext) -> Transform {
        let t = frame.elapsed;
        let phase = record.phase();

        if frame.is_tree() {
            let twinkle = 0.8 + (t * 3.0 + phase * 10.0).sin() * 0.3;
            return Transform::from_position(position)
                .with_rotation(record.rotation)
                .with_uniform_scale(Self::TREE_SIZE * twinkle * record.scale);
        }

        let jitter = Vec3::new(
            (t * 5.0 + phase).sin() * Self::JITTER,
            (t * 5.0 + phase).cos() * Self::JITTER,
            0.0,
        );
        let twinkle = 0.5 + (t * 15.0 + phase).sin() * 0.5;
        Transform::from_position(position + jitter)
            .with_rotation(record.rotation + Vec3::new(t, t, 0.0))
            .with_uniform_scale(Self::TEXT_SIZE * twinkle)
    }

    fn color_for(&self, record: &ParticleRecord, mode: SceneMode, _time: f32) -> Color {
        match mode {
            SceneMode::TreeShape => record.color,
            SceneMode::Scattered => Self::text_color(),
        }
    }
}

/// Gift boxes: vanish while spinning when the scene scatters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GiftLook;

impl GiftLook {
    /// Spin rate in radians per second while vanished
    pub const SPIN: f32 = 2.0;
}

impl CategoryLook for GiftLook {
    fn profile(&self) -> MotionProfile {
        MotionProfile::new(2.0)
    }

    fn pose(&self, record: &ParticleRecord, position: Vec3, frame: &FrameContext) -> Transform {
        if frame.is_tree() {
            return Transform::from_position(position)
                .with_rotation(record.rotation)
                .with_uniform_scale(record.scale);
        }
        let spin = frame.elapsed * Self::SPIN;
        Transform::from_position(position)
            .with_rotation(record.rotation + Vec3::new(spin, 0.0, spin))
            .with_uniform_scale(0.0)
    }

    fn color_for(&self, record: &ParticleRecord, _mode: SceneMode, _time: f32) -> Color {
        record.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FormationTargets;

    fn record(id: u32) -> ParticleRecord {
        ParticleRecord {
            id,
            targets: FormationTargets {
                tree: Vec3::ZERO,
                text: Vec3::new(0.0, 6.5, 0.0),
                scatter: Vec3::new(10.0, 0.0, 0.0),
            },
            origin: Vec3::ZERO,
            rotation: Vec3::new(0.3, 0.2, 0.1),
            scale: 1.2,
            color: Color::from_hex(0x41612A),
            speed: 0.8,
        }
    }

    #[test]
    fn dust_restores_static_pose_in_tree() {
        let look = DustLook::ornaments(DeviceClass::Wide);
        let frame = FrameContext::new(SceneMode::TreeShape, 0.016, 3.0);
        let pose = look.pose(&record(4), Vec3::new(1.0, 2.0, 3.0), &frame);
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation, Vec3::new(0.3, 0.2, 0.1));
        assert!((pose.scale.x - 0.35 * 1.2).abs() < 1e-6);
        assert_eq!(look.color_for(&record(4), SceneMode::TreeShape, 3.0), record(4).color);
    }

    #[test]
    fn foliage_sways_in_tree() {
        let look = DustLook::foliage(DeviceClass::Compact);
        let frame = FrameContext::new(SceneMode::TreeShape, 0.016, 1.0);
        let pose = look.pose(&record(0), Vec3::ZERO, &frame);
        assert!((pose.rotation.z - (0.1 + 1.0_f32.sin() * 0.02)).abs() < 1e-6);
        assert!((pose.rotation.x - (0.3 + 1.0_f32.cos() * 0.02)).abs() < 1e-6);
    }

    #[test]
    fn dust_glows_gold_in_text() {
        let look = DustLook::foliage(DeviceClass::Wide);
        let color = look.color_for(&record(1), SceneMode::Scattered, 0.0);
        assert!((color.r - 1.5).abs() < 1e-4);
        assert!(color.g > 1.4 && color.b > 1.2);

        let frame = FrameContext::new(SceneMode::Scattered, 0.016, 2.0);
        let pose = look.pose(&record(1), Vec3::ZERO, &frame);
        let max = 0.28 * 0.08 * 1.0 * 1.5;
        assert!(pose.scale.x <= max + 1e-6);
        assert!(pose.position.length() <= 0.02 * 2.0_f32.sqrt() + 1e-6);
    }

    #[test]
    fn lights_twinkle_within_range() {
        let look = FairyLightLook;
        for i in 0..50 {
            let t = i as f32 * 0.37;
            let tree = look.pose(&record(i), Vec3::ZERO, &FrameContext::new(SceneMode::TreeShape, 0.0, t));
            let size = 0.15 * 1.2;
            assert!(tree.scale.x >= size * 0.5 - 1e-6 && tree.scale.x <= size * 1.1 + 1e-6);
            let text = look.pose(&record(i), Vec3::ZERO, &FrameContext::new(SceneMode::Scattered, 0.0, t));
            assert!(text.scale.x >= 0.0 && text.scale.x <= 0.08 + 1e-6);
        }
        assert_eq!(look.color_for(&record(0), SceneMode::Scattered, 0.0).r, 2.0);
    }

    #[test]
    fn lights_use_their_own_size_and_tumble_in_text() {
        let look = FairyLightLook;
        let mut small = record(3);
        small.scale = 0.5;
        let frame = FrameContext::new(SceneMode::TreeShape, 0.0, 1.3);
        let big = look.pose(&record(3), Vec3::ZERO, &frame);
        let little = look.pose(&small, Vec3::ZERO, &frame);
        assert!((big.scale.x / little.scale.x - 1.2 / 0.5).abs() < 1e-4);

        let text = look.pose(&record(3), Vec3::ZERO, &FrameContext::new(SceneMode::Scattered, 0.0, 2.0));
        assert!((text.rotation.x - (0.3 + 2.0)).abs() < 1e-6);
        assert!((text.rotation.y - (0.2 + 2.0)).abs() < 1e-6);
        assert!((text.rotation.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn gift_vanishes_when_scattered() {
        let look = GiftLook;
        let frame = FrameContext::new(SceneMode::Scattered, 0.016, 0.5);
        let pose = look.pose(&record(2), Vec3::ZERO, &frame);
        assert!(pose.is_hidden());
        assert!((pose.rotation.x - (0.3 + 1.0)).abs() < 1e-6);
        assert!(look.profile().swirl.is_none());
        assert!(!look.profile().soft_landing);
    }
}
