//! Server error types.

use std::net::SocketAddr;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Settings could not be loaded.
    #[error(transparent)]
    Config(#[from] forgeweb_config::ConfigError),

    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// IO error while serving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
