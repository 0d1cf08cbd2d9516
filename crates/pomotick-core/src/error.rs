//! Core error types for pomotick-core.
//!
//! The countdown itself never fails; errors come from the edges: mode ids
//! that are not registered, configuration that cannot be loaded or does not
//! describe a usable set of modes, and display inputs outside `mm:ss`.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::ModeId;

/// Core error type for pomotick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A mode id was passed that the registry does not know about.
    #[error("mode '{0}' is not registered")]
    UnregisteredMode(ModeId),

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

    /// Dot-path key that does not exist in the config tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The home/config directory could not be resolved
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// String that does not name any mode
    #[error("unknown mode id '{0}' (expected pomodoro, short_break or long_break)")]
    UnknownModeId(String),

    /// Mode duration outside the displayable range
    #[error("duration for '{mode}' must be between 1 and 59 minutes, got {minutes}")]
    DurationOutOfRange { mode: ModeId, minutes: u64 },

    /// A mode the pomodoro cycle depends on is absent
    #[error("mode '{0}' is required but not registered")]
    MissingMode(ModeId),

    /// Same id registered twice
    #[error("mode '{0}' is registered more than once")]
    DuplicateMode(ModeId),

    /// Clock value that does not fit in `mm:ss`
    #[error("{0} seconds cannot be displayed as mm:ss")]
    ClockOutOfRange(u64),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
