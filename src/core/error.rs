//! Error types for core module
//!
//! Provides custom error types for configuration loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// Service URL that reqwest cannot use
    #[error("Invalid service URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Environment override that does not parse
    #[error("Invalid value for {key}: '{value}'")]
    InvalidOverride { key: String, value: String },

    /// Interval or timeout of zero
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
