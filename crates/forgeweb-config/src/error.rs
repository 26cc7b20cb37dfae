//! Settings error types.

use std::path::PathBuf;

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No environment mode was selected.
    #[error("No environment selected (use --env or FORGEWEB_ENV)")]
    MissingEnvironment,

    /// The settings file has no table for the selected mode.
    #[error("Environment '{mode}' is not defined in {}", .path.display())]
    UnknownEnvironment {
        /// Selected mode.
        mode: String,
        /// Settings file that was searched.
        path: PathBuf,
    },

    /// The settings file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML.
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A value could not be coerced to the requested type.
    #[error("Invalid value for '{key}': expected {expected}, got '{value}'")]
    InvalidValue {
        /// Settings key.
        key: String,
        /// Expected type.
        expected: &'static str,
        /// Offending value as text.
        value: String,
    },

    /// Typed deserialization of the settings failed.
    #[error("Failed to deserialize settings: {0}")]
    Deserialize(String),
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(
        key: impl Into<String>,
        expected: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            expected,
            value: value.into(),
        }
    }
}
