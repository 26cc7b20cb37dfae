//! Migration error types.

use crate::validate::ValidationFailure;
use forgeweb_config::ConfigError;
use std::path::PathBuf;

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Migration error type.
///
/// A migration engine that runs but exits non-zero is not an error: it is
/// reported as [`EngineOutcome::Fatal`](crate::engine::EngineOutcome::Fatal).
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Settings could not be loaded or read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Required settings are missing or invalid.
    #[error("{0}")]
    Validation(ValidationFailure),

    /// Dialect is not one of the supported databases.
    #[error("Database dialect not supported: '{0}' (expected postgres or mysql)")]
    UnsupportedDialect(String),

    /// The migration engine program could not be found.
    #[error("Required program '{program}' was not found on PATH")]
    UnresolvedDependency {
        /// Program name or path that was searched for.
        program: String,
    },

    /// The migration engine could not be started.
    #[error("Failed to start {}: {source}", .program.display())]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrationError {
    /// Create an unresolved dependency error.
    pub fn unresolved(program: impl Into<String>) -> Self {
        Self::UnresolvedDependency {
            program: program.into(),
        }
    }

    /// Whether the error was caused by the user's settings.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::UnsupportedDialect(_)
        )
    }
}

impl From<ValidationFailure> for MigrationError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}
