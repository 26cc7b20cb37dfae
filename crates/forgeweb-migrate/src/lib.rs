//! # Forgeweb Migrate
//!
//! Database migration orchestration for forgeweb applications.
//!
//! This crate provides:
//! - Per-dialect defaults for port and SSL mode (PostgreSQL and MySQL)
//! - Validation of database settings with ordered violation reports
//! - Connection string rendering in each driver's native format
//! - Invocation of the external migration engine (`goose` by default)
//!
//! ## Example
//!
//! ```rust,no_run
//! use forgeweb_config::SettingsLoader;
//! use forgeweb_migrate::{pipeline, EngineOutcome, MigrationEngine, Subcommand};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = Path::new(".");
//!     let engine = MigrationEngine::locate("goose", root)?;
//!     let mut store = SettingsLoader::database(root).mode("dev").load()?;
//!
//!     let outcome = pipeline::run(&mut store, &engine, Subcommand::Up, &mut std::io::stdout()).await?;
//!     if let EngineOutcome::Fatal { code, .. } = outcome {
//!         std::process::exit(code);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod validate;

pub use config::{keys, Dialect, MigrationConfig, MigrationConfigBuilder, UNSET_PORT};
pub use dialect::{DialectDefaults, DialectStrategy, MySqlDialect, PostgresDialect};
pub use engine::{
    resolve_program, EngineOutcome, EngineReport, MigrationEngine, Subcommand, DEFAULT_ENGINE,
    ENGINE_FAILURE_EXIT_CODE, MIGRATIONS_DIR,
};
pub use error::{MigrationError, Result};
pub use pipeline::{prepare, PreparedMigration};
pub use validate::{validate_config, FieldViolation, ValidationFailure};
