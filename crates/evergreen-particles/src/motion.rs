//! Per-particle easing toward a formation target
//!
//! Exponential approach with a per-particle speed factor, optional spiral
//! swirl while the particle is far away, soft landing near the end and an
//! optional fixed-rate settle so dispersed formations converge sharply.

use evergreen_core::Vec3;

/// A particle within this distance of its target has arrived
pub const ARRIVAL_DISTANCE: f32 = 0.05;
/// Below this distance the easing rate is halved
pub const SOFT_LANDING_DISTANCE: f32 = 0.5;
/// Swirl only applies while farther than this
pub const SWIRL_DISTANCE: f32 = 2.0;
/// Height of the notional vertical axis the swirl circles around
pub const SWIRL_AXIS_HEIGHT: f32 = 5.0;

/// Easing parameters of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Multiplier on `delta * speed`
    pub gain: f32,
    /// Tangential swirl strength, if the category swirls
    pub swirl: Option<f32>,
    pub soft_landing: bool,
    /// Fixed lerp rate used once arrived while heading to a dispersed target
    pub settle_rate: Option<f32>,
}

impl MotionProfile {
    pub const fn new(gain: f32) -> Self {
        Self {
            gain,
            swirl: None,
            soft_landing: false,
            settle_rate: None,
        }
    }

    pub const fn with_swirl(mut self, strength: f32) -> Self {
        self.swirl = Some(strength);
        self
    }

    pub const fn with_soft_landing(mut self) -> Self {
        self.soft_landing = true;
        self
    }

    pub const fn with_settle(mut self, rate: f32) -> Self {
        self.settle_rate = Some(rate);
        self
    }

    /// Easing fraction for this tick, clamped so a long frame never overshoots
    pub fn rate(&self, delta: f32, speed: f32, distance: f32) -> f32 {
        let mut rate = delta * speed * self.gain;
        if self.soft_landing && distance < SOFT_LANDING_DISTANCE {
            rate *= 0.5;
        }
        rate.clamp(0.0, 1.0)
    }
}

/// Advance `position` one tick toward `target`, mutating it in place.
///
/// Returns the distance measured before the move.
pub fn step(
    position: &mut Vec3,
    target: Vec3,
    speed: f32,
    delta: f32,
    profile: &MotionProfile,
    toward_dispersed: bool,
) -> f32 {
    let distance = position.distance(&target);
    if !distance.is_finite() {
        return distance;
    }

    if distance > ARRIVAL_DISTANCE {
        position.lerp_towards(&target, profile.rate(delta, speed, distance));

        if let Some(strength) = profile.swirl {
            if distance > SWIRL_DISTANCE {
                apply_swirl(position, delta * strength);
            }
        }
    } else if toward_dispersed {
        if let Some(rate) = profile.settle_rate {
            position.lerp_towards(&target, rate);
        }
    }

    distance
}

/// Push `amount` along the unit tangent around the swirl axis: the
/// horizontal offset from the axis, rotated by 90 degrees.
fn apply_swirl(position: &mut Vec3, amount: f32) {
    let offset = Vec3::new(position.x, position.y - SWIRL_AXIS_HEIGHT, position.z);
    // Tangent of a zero-length horizontal offset is undefined
    let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
    if horizontal < 1e-6 || !horizontal.is_finite() {
        return;
    }
    position.x += offset.z / horizontal * amount;
    position.z += -offset.x / horizontal * amount;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLIAGE: MotionProfile = MotionProfile::new(4.0)
        .with_swirl(1.5)
        .with_soft_landing()
        .with_settle(0.1);

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn first_tick_moves_forty_percent_plus_swirl() {
        let mut p = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(10.0, 10.0, 10.0);
        step(&mut p, target, 1.0, 0.1, &FOLIAGE, true);

        // Straight-line part: 40% of the way, y has no swirl component
        let lerped = Vec3::new(4.6, 5.2, 5.8);
        assert!(close(p.y, lerped.y));

        // Swirl adds delta * strength along the unit tangent (z, -x) / |(x, z)|
        let horizontal = (4.6f32 * 4.6 + 5.8 * 5.8).sqrt();
        assert!(close(p.x, lerped.x + 5.8 / horizontal * 0.15));
        assert!(close(p.z, lerped.z - 4.6 / horizontal * 0.15));
        assert!(p.distance(&target) > 0.0);
    }

    #[test]
    fn converges_monotonically_without_swirl() {
        let mut p = Vec3::new(0.0, 0.0, 0.0);
        let target = Vec3::new(1.0, 1.0, 0.5);
        let mut last = p.distance(&target);
        let mut ticks = 0;
        while last > ARRIVAL_DISTANCE {
            step(&mut p, target, 0.7, 1.0 / 60.0, &FOLIAGE, false);
            let d = p.distance(&target);
            assert!(d < last, "distance grew from {last} to {d}");
            last = d;
            ticks += 1;
            assert!(ticks < 10_000, "never arrived");
        }
    }

    #[test]
    fn single_tick_is_bounded() {
        let profile = MotionProfile::new(4.5).with_swirl(2.0).with_soft_landing();
        let start = Vec3::new(-20.0, 3.0, 14.0);
        let target = Vec3::new(12.0, -6.0, -9.0);
        let delta = 1.0 / 30.0;
        let speed = 0.9;

        let mut p = start;
        step(&mut p, target, speed, delta, &profile, true);

        let distance = start.distance(&target);
        let rate = delta * speed * 4.5;
        let bound = rate * distance + delta * 2.0;
        assert!(start.distance(&p) <= bound + 1e-4);
        assert!(start.distance(&p) < distance);
    }

    #[test]
    fn arrival_boundary_counts_as_arrived() {
        let target = Vec3::new(0.0, 0.0, 0.0);
        let mut p = Vec3::new(ARRIVAL_DISTANCE, 0.0, 0.0);
        step(&mut p, target, 1.0, 0.1, &MotionProfile::new(4.0), false);
        assert_eq!(p, Vec3::new(ARRIVAL_DISTANCE, 0.0, 0.0));
    }

    #[test]
    fn settles_only_toward_dispersed() {
        let target = Vec3::ZERO;
        let mut toward_tree = Vec3::new(0.04, 0.0, 0.0);
        step(&mut toward_tree, target, 1.0, 0.1, &FOLIAGE, false);
        assert_eq!(toward_tree.x, 0.04);

        let mut toward_text = Vec3::new(0.04, 0.0, 0.0);
        step(&mut toward_text, target, 1.0, 0.1, &FOLIAGE, true);
        assert!(close(toward_text.x, 0.036));
    }

    #[test]
    fn soft_landing_halves_the_rate() {
        let profile = MotionProfile::new(4.0).with_soft_landing();
        assert!(close(profile.rate(0.1, 1.0, 3.0), 0.4));
        assert!(close(profile.rate(0.1, 1.0, 0.3), 0.2));
        assert!(close(MotionProfile::new(4.0).rate(0.1, 1.0, 0.3), 0.4));
    }

    #[test]
    fn long_frames_never_overshoot() {
        let mut p = Vec3::new(0.0, 10.0, 0.0);
        let target = Vec3::new(0.0, 0.0, 0.0);
        step(&mut p, target, 1.0, 5.0, &MotionProfile::new(4.0), false);
        assert_eq!(p, target);
    }

    #[test]
    fn swirl_does_not_stall_far_from_the_axis() {
        // Slow particle heading for the edge of the text
        let mut p = Vec3::new(2.0, -4.0, 1.0);
        let target = Vec3::new(13.5, 9.0, 0.0);
        for _ in 0..600 {
            step(&mut p, target, 0.4, 1.0 / 60.0, &FOLIAGE, true);
        }
        assert!(p.distance(&target) < ARRIVAL_DISTANCE);
    }

    #[test]
    fn swirl_skipped_on_the_axis() {
        // Lerp lands exactly on the vertical axis, so no tangent exists
        let mut p = Vec3::new(0.0, 20.0, 0.0);
        let target = Vec3::new(0.0, -20.0, 0.0);
        step(&mut p, target, 1.0, 0.1, &FOLIAGE, true);
        assert!(p.is_finite());
        assert_eq!(p.x, 0.0);
        assert_eq!(p.z, 0.0);
    }
}
