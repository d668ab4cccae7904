//! Evergreen Core - Foundational types for the evergreen particle scene
//!
//! This crate provides the types that all other evergreen crates depend on:
//! - `Vec3`, `Color`, `Transform` - Spatial and color types
//! - `DeviceClass` - Coarse viewport class that drives particle budgets
//! - `CatmullRomCurve` - Uniform and centripetal spline evaluation
//! - Error types and Result alias

mod device;
mod error;
pub mod spline;
mod types;

pub use device::DeviceClass;
pub use error::{EvergreenError, Result};
pub use spline::{CatmullRomCurve, CurveKind};
pub use types::{Color, Transform, Vec3};
