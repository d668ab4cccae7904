//! CLI command implementations

pub mod ribbon;
pub mod simulate;
pub mod text;
