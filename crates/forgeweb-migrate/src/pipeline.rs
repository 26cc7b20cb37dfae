//! The migrate pipeline: read settings, apply defaults, validate, render,
//! then hand off to the engine.

use crate::config::{Dialect, MigrationConfig};
use crate::engine::{EngineOutcome, MigrationEngine, Subcommand};
use crate::error::{MigrationError, Result};
use crate::validate::validate_config;
use forgeweb_config::SettingsStore;
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use tracing::debug;

/// A validated configuration with its rendered connection string.
#[derive(Debug)]
pub struct PreparedMigration {
    config: MigrationConfig,
    dialect: Dialect,
    connection: SecretString,
}

impl PreparedMigration {
    /// The resolved configuration, defaults included.
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// The configured dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The rendered connection string.
    #[must_use]
    pub fn connection(&self) -> &str {
        self.connection.expose_secret()
    }
}

/// Resolve settings into a connection string.
///
/// Defaults are applied before validation and recorded in `store`.
pub fn prepare(store: &mut SettingsStore) -> Result<PreparedMigration> {
    let config = MigrationConfig::from_store(store)?.with_dialect_defaults();
    config.record_defaults(store);

    validate_config(&config)?;

    let dialect = config
        .dialect
        .ok_or_else(|| MigrationError::UnsupportedDialect(String::new()))?;
    let connection = dialect.strategy().render(&config);

    debug!(
        mode = store.mode(),
        %dialect,
        host = %config.host,
        port = config.port,
        dbname = %config.dbname,
        sslmode = %config.sslmode,
        "Resolved database settings"
    );

    Ok(PreparedMigration {
        config,
        dialect,
        connection: SecretString::new(connection),
    })
}

/// Run one migrate subcommand.
///
/// The engine's combined output is written to `out` whether or not the
/// engine succeeds. Settings and validation problems are returned as errors
/// and never reach the engine.
pub async fn run<W: Write>(
    store: &mut SettingsStore,
    engine: &MigrationEngine,
    subcommand: Subcommand,
    out: &mut W,
) -> Result<EngineOutcome> {
    let prepared = prepare(store)?;

    let report = engine
        .invoke(prepared.dialect(), prepared.connection(), subcommand)
        .await?;

    out.write_all(&report.output)?;
    out.flush()?;

    Ok(report.outcome())
}
