//! Transient effects: pooled fireworks and the shooting light

mod fireworks;
mod shooting;

pub use fireworks::{BatchState, FireworkBatch, FireworkParticle, Fireworks, HIDDEN_Y, PALETTE};
pub use shooting::{path_point, ShootingLight};
