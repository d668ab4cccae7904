//! Lightweight xorshift32 PRNG: seeded so formations are reproducible

use evergreen_core::Vec3;
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit exactly in an f32 mantissa, so 1.0 is never produced
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a float in [-width / 2, width / 2)
    pub fn centered(&mut self, width: f32) -> f32 {
        (self.next_f32() - 0.5) * width
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Returns an index in [0, len). `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Pick one element, or `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }

    /// Uniform direction on the unit sphere from spherical coordinates
    pub fn unit_direction(&mut self) -> Vec3 {
        let theta = TAU * self.next_f32();
        let phi = (2.0 * self.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        let sin_phi = phi.sin();
        Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), phi.cos())
    }

    /// Point uniformly distributed by volume inside a sphere of `radius`.
    ///
    /// The cube root on the radius keeps the density even instead of
    /// piling points up near the center.
    pub fn in_sphere(&mut self, radius: f32) -> Vec3 {
        let dir = self.unit_direction();
        let r = self.next_f32().cbrt() * radius;
        dir * r
    }

    /// Random angle in [0, 2pi)
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, TAU)
    }

    /// Random angle in [0, pi)
    pub fn half_angle(&mut self) -> f32 {
        self.range(0.0, PI)
    }
}
