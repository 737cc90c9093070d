//! Core error types for playout-core.
//!
//! Expected "nothing to do" situations (day already full, empty filler pool,
//! no schedule for a date) are modelled as outcome values by the components
//! themselves. The types here cover structurally invalid input and the
//! ambient concerns (configuration, IO, serialization).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for playout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A schedule entry references a program the store does not know
    #[error("Program not found: {id}")]
    ProgramNotFound { id: String },

    /// A media id could not be resolved in the catalog
    #[error("Media not found: {id}")]
    MediaNotFound { id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Segment or media duration is zero, negative or not a number
    #[error("Invalid duration for '{source_path}': {duration} (must be > 0 seconds)")]
    NonPositiveDuration { source_path: String, duration: f64 },

    /// Time-of-day string could not be parsed
    #[error("Invalid time '{0}': expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    /// Calendar date string could not be parsed
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Repeat pattern is not one of none/daily/weekly/monthly
    #[error("Unknown repeat pattern '{0}': expected daily, weekly or monthly")]
    UnknownRepeatPattern(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidTime("25:99".into()).into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("25:99"));
    }

    #[test]
    fn custom_error_displays_message_only() {
        let err = CoreError::Custom("program.json: not a program".into());
        assert_eq!(err.to_string(), "program.json: not a program");
    }

    #[test]
    fn program_not_found_names_the_id() {
        let err = CoreError::ProgramNotFound { id: "p-42".into() };
        assert_eq!(err.to_string(), "Program not found: p-42");
    }
}
