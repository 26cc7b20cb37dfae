//! Server settings.

use forgeweb_config::{Result, SettingsStore};
use serde::Deserialize;
use std::net::SocketAddr;

/// Default listen address.
pub const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 4000);

/// Settings read from the mode's table in `config/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,
    /// Send no-cache headers on every response.
    pub assets_no_cache: bool,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(DEFAULT_BIND),
            assets_no_cache: false,
            cors: false,
        }
    }
}

impl ServerConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read server settings from a store. Missing keys take their defaults.
    pub fn from_store(store: &SettingsStore) -> Result<Self> {
        store.deserialize()
    }

    /// Set the listen address.
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Toggle no-cache headers.
    #[must_use]
    pub fn with_assets_no_cache(mut self, enabled: bool) -> Self {
        self.assets_no_cache = enabled;
        self
    }

    /// Toggle CORS.
    #[must_use]
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }
}
