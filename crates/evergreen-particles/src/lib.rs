//! Evergreen Particles - Christmas tree and greeting text choreography
//!
//! Thousands of particles ease between a conical tree and a glowing
//! "Merry Christmas" point cloud:
//! - Seeded formation generators per category (foliage, ornaments, lights, gifts)
//! - Text point sampling behind a `GlyphMask` seam, shared through a sequential allocator
//! - Formation cache keyed by category, count and device class
//! - Per-category animators with swirl, soft landing and text settling
//! - Star, ribbon and gift-lid extras
//! - Pooled fireworks and the shooting light
//! - Instance packing for instanced draw calls

pub mod animator;
pub mod cache;
pub mod config;
pub mod effects;
pub mod formation;
pub mod instance;
pub mod motion;
pub mod rand;
pub mod record;
pub mod scene;
pub mod text;

pub use animator::{
    CategoryLook, GiftAnimator, InstanceState, ParticleAnimator, RibbonAnimator, RibbonMesh,
    RibbonPath, StarAnimator,
};
pub use cache::{FormationCache, FormationKey, FormationSet};
pub use config::{CountsConfig, FireworksConfig, ParticleCounts, SceneConfig, ShootingLightConfig};
pub use effects::{Fireworks, ShootingLight};
pub use instance::{DrawData, DrawLayer, InstancePacker, InstanceRaw, PointRaw};
pub use record::{Category, FormationKind, FormationTargets, ParticleRecord};
pub use scene::{HolidayScene, SceneSway};
pub use text::{BlockFont, GlyphMask, TextLayout, TextPool, TextSampler};
