//! # Forgeweb Config
//!
//! Settings for forgeweb applications.
//!
//! Settings live in mode-sectioned TOML files under `config/` (one table per
//! environment such as `[dev]` or `[prod]`). Environment variables prefixed
//! with `FORGEWEB_` override file values, and values written at runtime
//! override both.
//!
//! ## Example
//!
//! ```rust,no_run
//! use forgeweb_config::SettingsLoader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SettingsLoader::database(".").mode("prod").load()?;
//!     println!("database host: {}", store.get_string("host"));
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod store;

pub use error::{ConfigError, Result};
pub use loader::{
    SettingsLoader, APP_SETTINGS_FILE, DATABASE_SETTINGS_FILE, DEFAULT_ENV_PREFIX, DEFAULT_MODE,
};
pub use store::SettingsStore;
