//! Scene configuration
//!
//! Every field has a default, so an empty TOML file is a valid config.
//! Values are checked by `validate` after parsing.

use evergreen_core::{DeviceClass, EvergreenError, Result};
use evergreen_runtime::SceneMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Particle budget for one device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleCounts {
    pub foliage: usize,
    pub ornaments: usize,
    pub lights: usize,
    #[serde(default = "default_gifts")]
    pub gifts: usize,
}

fn default_gifts() -> usize {
    25
}

impl ParticleCounts {
    /// Particles that draw from the shared text pool
    pub fn text_total(&self) -> usize {
        self.foliage + self.ornaments + self.lights
    }

    pub fn total(&self) -> usize {
        self.text_total() + self.gifts
    }
}

/// Per-device particle budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsConfig {
    pub compact: ParticleCounts,
    pub wide: ParticleCounts,
}

impl Default for CountsConfig {
    fn default() -> Self {
        Self {
            compact: ParticleCounts {
                foliage: 8000,
                ornaments: 250,
                lights: 400,
                gifts: default_gifts(),
            },
            wide: ParticleCounts {
                foliage: 12000,
                ornaments: 400,
                lights: 600,
                gifts: default_gifts(),
            },
        }
    }
}

impl CountsConfig {
    pub fn for_device(&self, device: DeviceClass) -> ParticleCounts {
        device.pick(self.compact, self.wide)
    }
}

/// Firework pool and physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Total pooled particles, split into equal batches
    pub particle_count: usize,
    pub batch_size: usize,
    /// Seconds a batch stays active
    pub duration: f32,
    pub gravity: f32,
    pub gravity_scale: f32,
    /// Velocity multiplier applied once per tick
    pub drag: f32,
    /// Life lost per second
    pub life_decay: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Delay range before the next launch, in seconds
    pub delay_min: f32,
    pub delay_max: f32,
    /// Corners of the box launch origins are drawn from
    pub origin_min: [f32; 3],
    pub origin_max: [f32; 3],
    pub point_size: f32,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            particle_count: 1500,
            batch_size: 100,
            duration: 2.0,
            gravity: 9.8,
            gravity_scale: 0.5,
            drag: 0.96,
            life_decay: 0.8,
            speed_min: 5.0,
            speed_max: 15.0,
            delay_min: 0.3,
            delay_max: 0.8,
            origin_min: [-15.0, 5.0, -10.0],
            origin_max: [15.0, 20.0, 0.0],
            point_size: 0.6,
        }
    }
}

impl FireworksConfig {
    pub fn batch_count(&self) -> usize {
        if self.batch_size == 0 {
            0
        } else {
            self.particle_count / self.batch_size
        }
    }
}

/// The spiralling light that circles the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingLightConfig {
    /// Path progress per second; one full climb takes `1 / speed` seconds
    pub speed: f32,
    pub trail_length: usize,
    pub trail_width: f32,
}

impl Default for ShootingLightConfig {
    fn default() -> Self {
        Self {
            speed: 0.4,
            trail_length: 32,
            trail_width: 1.5,
        }
    }
}

/// Top-level scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for every generator and effect
    pub seed: u32,
    pub initial_mode: SceneMode,
    pub counts: CountsConfig,
    pub fireworks: FireworksConfig,
    pub shooting_light: ShootingLightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x00C0_FFEE,
            initial_mode: SceneMode::TreeShape,
            counts: CountsConfig::default(),
            fireworks: FireworksConfig::default(),
            shooting_light: ShootingLightConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            EvergreenError::TomlParse(msg) => EvergreenError::Config(format!(
                "Failed to parse config {}: {}",
                path.display(),
                msg
            )),
            other => other,
        })?;
        log::info!("[particles] Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let fw = &self.fireworks;
        if fw.batch_size == 0 {
            return Err(EvergreenError::Config(
                "fireworks.batch_size must be greater than zero".to_string(),
            ));
        }
        if fw.particle_count % fw.batch_size != 0 {
            return Err(EvergreenError::Config(format!(
                "fireworks.particle_count ({}) must be a multiple of batch_size ({})",
                fw.particle_count, fw.batch_size
            )));
        }
        if fw.duration <= 0.0 || !fw.duration.is_finite() {
            return Err(EvergreenError::Config(format!(
                "fireworks.duration must be positive, got {}",
                fw.duration
            )));
        }
        if !(fw.drag > 0.0 && fw.drag <= 1.0) {
            return Err(EvergreenError::ValueOutOfRange {
                field: "fireworks.drag".to_string(),
                min: 0.0,
                max: 1.0,
                value: fw.drag as f64,
            });
        }
        check_range("fireworks.speed", fw.speed_min, fw.speed_max)?;
        check_range("fireworks.delay", fw.delay_min, fw.delay_max)?;
        for axis in 0..3 {
            check_range("fireworks.origin", fw.origin_min[axis], fw.origin_max[axis])?;
        }
        if fw.delay_min < 0.0 {
            return Err(EvergreenError::Config(format!(
                "fireworks.delay_min must not be negative, got {}",
                fw.delay_min
            )));
        }

        let light = &self.shooting_light;
        if light.speed < 0.0 || !light.speed.is_finite() {
            return Err(EvergreenError::Config(format!(
                "shooting_light.speed must not be negative, got {}",
                light.speed
            )));
        }
        if light.trail_length == 0 {
            return Err(EvergreenError::Config(
                "shooting_light.trail_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &str, min: f32, max: f32) -> Result<()> {
    if min > max || !min.is_finite() || !max.is_finite() {
        return Err(EvergreenError::Config(format!(
            "{field}: min ({min}) must not exceed max ({max})"
        )));
    }
    Ok(())
}
