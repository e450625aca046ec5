//! Core error types for ambiroom-core.
//!
//! The timer engine itself never fails. Errors come from the layers around
//! it: configuration files, user input validation and the sound backend.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ambiroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sound mixer errors
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be created
    #[error("Cannot prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty
    #[error("'{0}' must not be empty")]
    EmptyText(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Sound mixer errors.
#[derive(Error, Debug)]
pub enum SoundError {
    /// Sound id is not in the catalog
    #[error("unknown sound: {0}")]
    UnknownSound(String),

    /// Saved mix id does not exist
    #[error("unknown mix: {0}")]
    UnknownMix(String),

    /// The playback backend refused to start or control a sound
    #[error("playback failed for '{sound_id}': {message}")]
    Playback { sound_id: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
