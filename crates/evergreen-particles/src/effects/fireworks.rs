//! Pooled firework bursts
//!
//! A fixed pool of particles split into equal batches. While armed, a new
//! batch launches whenever scene time passes the randomized next-trigger
//! deadline and an inactive batch is available. Batches fly ballistically
//! with drag and return to the pool after their duration.

use crate::config::FireworksConfig;
use crate::rand::ParticleRng;
use evergreen_core::{Color, Vec3};
use evergreen_runtime::{FrameContext, SceneSystem};

/// Height expired particles are parked at, far outside the visible volume
pub const HIDDEN_Y: f32 = -1000.0;

pub const PALETTE: [u32; 6] = [0xFF0044, 0x00FF88, 0x4488FF, 0xFFD700, 0xFFFFFF, 0xFF00FF];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireworkParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1.0 at launch, decays linearly; negative while pooled
    pub life: f32,
}

impl FireworkParticle {
    fn parked() -> Self {
        Self {
            position: Vec3::new(0.0, HIDDEN_Y, 0.0),
            velocity: Vec3::ZERO,
            life: -1.0,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.position.y <= HIDDEN_Y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchState {
    Inactive,
    Active { remaining: f32 },
}

/// A contiguous slice of the particle pool launched together
#[derive(Debug, Clone, PartialEq)]
pub struct FireworkBatch {
    pub offset: usize,
    pub count: usize,
    pub state: BatchState,
    pub color: Color,
}

impl FireworkBatch {
    pub fn is_active(&self) -> bool {
        matches!(self.state, BatchState::Active { .. })
    }
}

pub struct Fireworks {
    config: FireworksConfig,
    rng: ParticleRng,
    particles: Vec<FireworkParticle>,
    batches: Vec<FireworkBatch>,
    next_trigger: f32,
    armed: bool,
    /// Batch indices launched since the last `take_launches`
    launches: Vec<usize>,
}

impl Fireworks {
    pub fn new(config: FireworksConfig, seed: u32) -> Self {
        let batch_size = config.batch_size.max(1);
        let batch_count = config.batch_count();
        let batches = (0..batch_count)
            .map(|i| FireworkBatch {
                offset: i * batch_size,
                count: batch_size,
                state: BatchState::Inactive,
                color: Color::WHITE,
            })
            .collect();
        Self {
            particles: vec![FireworkParticle::parked(); batch_count * batch_size],
            batches,
            rng: ParticleRng::new(seed),
            next_trigger: 0.0,
            armed: false,
            launches: Vec::new(),
            config,
        }
    }

    /// Allow or stop new launches. Batches already in flight always finish.
    pub fn set_armed(&mut self, armed: bool) {
        if armed != self.armed {
            log::debug!("[fireworks] {}", if armed { "Armed" } else { "Disarmed" });
        }
        self.armed = armed;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn update(&mut self, frame: &FrameContext) {
        if self.armed && frame.elapsed >= self.next_trigger {
            match self.batches.iter().position(|b| !b.is_active()) {
                Some(index) => self.launch(index, frame.elapsed),
                // Pool exhausted: retry on a later frame
                None => log::trace!("[fireworks] No free batch, launch skipped"),
            }
        }

        let dt = frame.delta;
        let fall = self.config.gravity * self.config.gravity_scale * dt;
        for batch in &mut self.batches {
            let BatchState::Active { remaining } = batch.state else {
                continue;
            };
            let remaining = remaining - dt;
            let slots = &mut self.particles[batch.offset..batch.offset + batch.count];

            if remaining <= 0.0 {
                batch.state = BatchState::Inactive;
                for p in slots {
                    p.life = -1.0;
                    p.position.y = HIDDEN_Y;
                }
                continue;
            }
            batch.state = BatchState::Active { remaining };

            for p in slots.iter_mut().filter(|p| p.life > 0.0) {
                p.velocity.y -= fall;
                p.velocity = p.velocity * self.config.drag;
                p.position += p.velocity * dt;
                p.life -= dt * self.config.life_decay;
            }
        }
    }

    fn launch(&mut self, index: usize, now: f32) {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let origin = Vec3::new(
            rng.range(cfg.origin_min[0], cfg.origin_max[0]),
            rng.range(cfg.origin_min[1], cfg.origin_max[1]),
            rng.range(cfg.origin_min[2], cfg.origin_max[2]),
        );
        let color = rng
            .pick(&PALETTE)
            .map(|&hex| Color::from_hex(hex))
            .unwrap_or(Color::WHITE);

        let batch = &mut self.batches[index];
        batch.state = BatchState::Active {
            remaining: cfg.duration,
        };
        batch.color = color;

        for p in &mut self.particles[batch.offset..batch.offset + batch.count] {
            let speed = rng.range(cfg.speed_min, cfg.speed_max);
            *p = FireworkParticle {
                position: origin,
                velocity: rng.unit_direction() * speed,
                life: 1.0,
            };
        }

        self.next_trigger = now + rng.range(cfg.delay_min, cfg.delay_max);
        self.launches.push(index);
        log::debug!(
            "[fireworks] Launched batch {index} at ({:.1}, {:.1}, {:.1})",
            origin.x,
            origin.y,
            origin.z
        );
    }

    /// Batches launched since the previous call
    pub fn take_launches(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.launches)
    }

    pub fn active_batches(&self) -> usize {
        self.batches.iter().filter(|b| b.is_active()).count()
    }

    pub fn batches(&self) -> &[FireworkBatch] {
        &self.batches
    }

    pub fn particles(&self) -> &[FireworkParticle] {
        &self.particles
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    /// Color and point size of every pooled particle, in pool order
    pub fn points(&self) -> impl Iterator<Item = (&FireworkParticle, Color, f32)> + '_ {
        self.batches.iter().flat_map(move |batch| {
            let size = if batch.is_active() {
                self.config.point_size
            } else {
                0.0
            };
            self.particles[batch.offset..batch.offset + batch.count]
                .iter()
                .map(move |p| (p, batch.color, if p.life > 0.0 { size } else { 0.0 }))
        })
    }
}

impl SceneSystem for Fireworks {
    fn update(&mut self, frame: &FrameContext) {
        Fireworks::update(self, frame);
    }

    fn name(&self) -> &str {
        "fireworks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_runtime::SceneMode;

    fn frame(delta: f32, elapsed: f32) -> FrameContext {
        FrameContext::new(SceneMode::Scattered, delta, elapsed)
    }

    #[test]
    fn pool_starts_hidden() {
        let fireworks = Fireworks::new(FireworksConfig::default(), 1);
        assert_eq!(fireworks.particles().len(), 1500);
        assert_eq!(fireworks.batches().len(), 15);
        assert!(fireworks.particles().iter().all(|p| p.is_hidden()));
        assert_eq!(fireworks.active_batches(), 0);
    }

    #[test]
    fn disarmed_never_launches() {
        let mut fireworks = Fireworks::new(FireworksConfig::default(), 1);
        for i in 0..100 {
            fireworks.update(&frame(0.05, i as f32 * 0.05));
        }
        assert_eq!(fireworks.active_batches(), 0);
        assert!(fireworks.take_launches().is_empty());
    }

    #[test]
    fn batch_expires_after_duration() {
        let mut fireworks = Fireworks::new(FireworksConfig::default(), 9);
        fireworks.set_armed(true);
        fireworks.update(&frame(0.0, 0.0));
        assert_eq!(fireworks.take_launches(), vec![0]);
        fireworks.set_armed(false);

        let mut elapsed = 0.0;
        for _ in 0..100 {
            elapsed += 0.01;
            fireworks.update(&frame(0.01, elapsed));
        }
        assert!(fireworks.batches()[0].is_active());
        let batch = &fireworks.particles()[0..100];
        assert!(batch.iter().all(|p| !p.is_hidden() && p.life > 0.0));

        for _ in 0..101 {
            elapsed += 0.01;
            fireworks.update(&frame(0.01, elapsed));
        }
        assert!(elapsed >= 2.0);
        assert_eq!(fireworks.batches()[0].state, BatchState::Inactive);
        assert!(fireworks.particles()[0..100].iter().all(|p| p.is_hidden()));
        assert!(fireworks.points().all(|(_, _, size)| size == 0.0));
    }

    #[test]
    fn exhausted_pool_skips_launches() {
        let config = FireworksConfig {
            delay_min: 0.0,
            delay_max: 0.0,
            ..Default::default()
        };
        let mut fireworks = Fireworks::new(config, 3);
        fireworks.set_armed(true);

        let mut launched = 0;
        for i in 0..40 {
            fireworks.update(&frame(0.01, i as f32 * 0.01));
            launched += fireworks.take_launches().len();
            assert!(fireworks.active_batches() <= 15);
        }
        assert_eq!(launched, 15);
        assert_eq!(fireworks.active_batches(), 15);
    }

    #[test]
    fn freed_batches_are_reused() {
        let config = FireworksConfig {
            delay_min: 0.0,
            delay_max: 0.0,
            ..Default::default()
        };
        let mut fireworks = Fireworks::new(config, 3);
        fireworks.set_armed(true);
        let mut launched = 0;
        for i in 0..300 {
            fireworks.update(&frame(0.01, i as f32 * 0.01));
            launched += fireworks.take_launches().len();
        }
        assert!(launched > 15);
    }

    #[test]
    fn particles_fall_and_fade() {
        let mut fireworks = Fireworks::new(FireworksConfig::default(), 5);
        fireworks.set_armed(true);
        fireworks.update(&frame(0.0, 0.0));
        fireworks.set_armed(false);
        let before: Vec<FireworkParticle> = fireworks.particles()[0..100].to_vec();

        fireworks.update(&frame(0.1, 0.1));
        for (old, new) in before.iter().zip(&fireworks.particles()[0..100]) {
            let expected_vy = (old.velocity.y - 9.8 * 0.5 * 0.1) * 0.96;
            assert!((new.velocity.y - expected_vy).abs() < 1e-4);
            assert!((new.life - 0.92).abs() < 1e-5);
            // Launch speed, before the first tick's drag
            let speed = old.velocity.length() / 0.96;
            assert!((5.0 - 1e-3..15.0 + 1e-3).contains(&speed));
        }
    }

    #[test]
    fn origins_stay_in_launch_box() {
        let config = FireworksConfig {
            delay_min: 0.0,
            delay_max: 0.0,
            ..Default::default()
        };
        let mut fireworks = Fireworks::new(config, 8);
        fireworks.set_armed(true);
        for i in 0..15 {
            fireworks.update(&frame(0.0, i as f32));
        }
        for batch in fireworks.batches() {
            let origin = fireworks.particles()[batch.offset].position;
            assert!((-15.0..=15.0).contains(&origin.x));
            assert!((5.0..=20.0).contains(&origin.y));
            assert!((-10.0..=0.0).contains(&origin.z));
        }
    }
}
