//! Error types for evergreen

use thiserror::Error;

/// The main error type for evergreen operations.
///
/// Only configuration loading and validation can fail. Per-frame simulation
/// never returns errors; it degrades instead.
#[derive(Debug, Error)]
pub enum EvergreenError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid particle layout: {0}")]
    InvalidParticleLayout(String),
}

/// Result type alias for evergreen operations
pub type Result<T> = std::result::Result<T, EvergreenError>;

impl From<toml::de::Error> for EvergreenError {
    fn from(err: toml::de::Error) -> Self {
        EvergreenError::TomlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: EvergreenError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, EvergreenError::TomlParse(_)));
    }

    #[test]
    fn range_error_message() {
        let err = EvergreenError::ValueOutOfRange {
            field: "drag".into(),
            min: 0.0,
            max: 1.0,
            value: 2.0,
        };
        assert_eq!(
            err.to_string(),
            "Value out of range: drag must be between 0 and 1, got 2"
        );
    }
}
