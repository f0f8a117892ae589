//! Core error types for jettimer-core.
//!
//! The countdown itself never fails: out-of-range edits and zero-length
//! starts are no-ops. These errors cover the ambient surfaces around it,
//! configuration IO and validation of user-supplied values.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimeField;

/// Core error type for jettimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Could not determine where configuration lives
    #[error("Cannot locate configuration directory: {0}")]
    NoDataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A time field was given a value outside its range
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: TimeField,
        value: u32,
        max: u32,
    },

    /// A gradient color is not `#rrggbb`
    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    /// A duration setting of zero length
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
