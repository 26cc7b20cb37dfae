//! Migration configuration.

use crate::error::{MigrationError, Result};
use forgeweb_config::{ConfigError, SettingsStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Settings keys read by the migrate command.
pub mod keys {
    /// Database dialect (`postgres` or `mysql`).
    pub const DB: &str = "db";
    /// Database name.
    pub const DBNAME: &str = "dbname";
    /// Database user.
    pub const USER: &str = "user";
    /// Database password.
    pub const PASS: &str = "pass";
    /// Database host.
    pub const HOST: &str = "host";
    /// Database port.
    pub const PORT: &str = "port";
    /// TLS / SSL mode.
    pub const SSLMODE: &str = "sslmode";
}

/// Port value that means "not configured".
///
/// A literal port of `0` cannot be expressed: it is always replaced by the
/// dialect default.
pub const UNSET_PORT: u16 = 0;

/// Database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL, rendered for the `pq` key/value connection format.
    Postgres,
    /// MySQL, rendered for the `user:pass@tcp(host:port)/db` DSN format.
    Mysql,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Self; 2] = [Self::Postgres, Self::Mysql];

    /// Token passed to the migration engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
        }
    }

    /// Parse a dialect setting. An empty value means "not configured".
    ///
    /// Names match exactly: `postgres` or `mysql`.
    pub fn from_setting(raw: &str) -> Result<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse::<Self>().map(Some)
    }
}

impl FromStr for Dialect {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            _ => Err(MigrationError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for one migrate invocation.
///
/// Built fresh from the settings store for every command, defaulted with
/// [`with_dialect_defaults`](Self::with_dialect_defaults), validated, then
/// rendered into a connection string once.
#[derive(Debug, Clone, Default, Validate)]
pub struct MigrationConfig {
    /// Database dialect.
    #[validate(required(message = "must be set to postgres or mysql"))]
    pub dialect: Option<Dialect>,

    /// Database user.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub user: String,

    /// Database password. `None` omits the credential segment entirely.
    pub pass: Option<SecretString>,

    /// Database host.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub host: String,

    /// Database port. [`UNSET_PORT`] is replaced by the dialect default.
    #[validate(range(min = 1, message = "must not be zero"))]
    pub port: u16,

    /// Database name.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub dbname: String,

    /// SSL mode (postgres) or TLS setting (mysql). Empty is replaced by the
    /// dialect default.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub sslmode: String,
}

impl MigrationConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> MigrationConfigBuilder {
        MigrationConfigBuilder::new()
    }

    /// Read the configuration from a settings store.
    ///
    /// Unknown dialects fail here, before any defaulting.
    pub fn from_store(store: &SettingsStore) -> Result<Self> {
        let dialect = Dialect::from_setting(&store.get_string(keys::DB))?;

        let port = store.get_int(keys::PORT)?;
        let port = u16::try_from(port).map_err(|_| {
            ConfigError::invalid_value(keys::PORT, "port number (0-65535)", port.to_string())
        })?;

        let pass = store.get_string(keys::PASS);

        Ok(Self {
            dialect,
            user: store.get_string(keys::USER),
            pass: (!pass.is_empty()).then(|| SecretString::new(pass)),
            host: store.get_string(keys::HOST),
            port,
            dbname: store.get_string(keys::DBNAME),
            sslmode: store.get_string(keys::SSLMODE),
        })
    }

    /// Fill the dialect's default port and SSL mode where they are unset.
    ///
    /// Other fields are left untouched. Without a dialect this is a no-op.
    #[must_use]
    pub fn with_dialect_defaults(mut self) -> Self {
        let Some(dialect) = self.dialect else {
            return self;
        };

        let defaults = dialect.strategy().defaults();
        if self.port == UNSET_PORT {
            self.port = defaults.port;
        }
        if self.sslmode.is_empty() {
            self.sslmode = defaults.sslmode.to_string();
        }
        self
    }

    /// Write defaulted port and SSL mode back to the store so later reads
    /// of those keys observe them.
    ///
    /// Only keys the store has no value for are written; configured values
    /// stay in the layer they came from.
    pub fn record_defaults(&self, store: &mut SettingsStore) {
        if self.dialect.is_none() {
            return;
        }
        if store
            .get_int(keys::PORT)
            .is_ok_and(|port| port == i64::from(UNSET_PORT))
        {
            store.set(keys::PORT, i64::from(self.port));
        }
        if store.get_string(keys::SSLMODE).is_empty() {
            store.set(keys::SSLMODE, self.sslmode.clone());
        }
    }

    /// The password, if one is configured and non-empty.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.pass
            .as_ref()
            .map(|secret| {
                let pass: &str = secret.expose_secret();
                pass
            })
            .filter(|pass| !pass.is_empty())
    }

    /// Render the connection string for the configured dialect.
    #[must_use]
    pub fn connection_string(&self) -> Option<String> {
        self.dialect.map(|dialect| dialect.strategy().render(self))
    }
}

/// Builder for migration configuration.
///
/// `build` performs no validation: defaults must be applied first.
#[derive(Debug, Default)]
pub struct MigrationConfigBuilder {
    config: MigrationConfig,
}

impl MigrationConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = Some(dialect);
        self
    }

    /// Set the user.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    /// Set the password. An empty password is treated as no password.
    #[must_use]
    pub fn pass(mut self, pass: impl Into<String>) -> Self {
        let pass = pass.into();
        self.config.pass = (!pass.is_empty()).then(|| SecretString::new(pass));
        self
    }

    /// Set the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the database name.
    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.config.dbname = dbname.into();
        self
    }

    /// Set the SSL mode.
    #[must_use]
    pub fn sslmode(mut self, sslmode: impl Into<String>) -> Self {
        self.config.sslmode = sslmode.into();
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MigrationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::new("dev")
            .with_file_value(keys::USER, "bob")
            .with_file_value(keys::HOST, "localhost")
            .with_file_value(keys::DBNAME, "app_dev")
    }

    #[test]
    fn test_dialect_parse() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::Mysql);
        assert!(matches!(
            "sqlite3".parse::<Dialect>(),
            Err(MigrationError::UnsupportedDialect(ref d)) if d == "sqlite3"
        ));
        assert_eq!(Dialect::from_setting("").unwrap(), None);
        assert_eq!(Dialect::from_setting("  ").unwrap(), None);
    }

    #[test]
    fn test_dialect_names_match_exactly() {
        for raw in ["MySQL", "Postgres", " mysql ", "postgres\n"] {
            assert!(
                matches!(
                    Dialect::from_setting(raw),
                    Err(MigrationError::UnsupportedDialect(ref d)) if d == raw
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
        assert_eq!(Dialect::Mysql.to_string(), "mysql");
    }

    #[test]
    fn test_from_store() {
        let store = store()
            .with_file_value(keys::DB, "postgres")
            .with_file_value(keys::PORT, 6432)
            .with_env_value(keys::PASS, "secret");

        let config = MigrationConfig::from_store(&store).unwrap();
        assert_eq!(config.dialect, Some(Dialect::Postgres));
        assert_eq!(config.user, "bob");
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.port, 6432);
        assert_eq!(config.sslmode, "");
    }

    #[test]
    fn test_from_store_empty_password_is_absent() {
        let store = store().with_file_value(keys::PASS, "");
        let config = MigrationConfig::from_store(&store).unwrap();
        assert!(config.pass.is_none());
        assert_eq!(config.password(), None);
    }

    #[test]
    fn test_from_store_rejects_unknown_dialect() {
        let store = store().with_file_value(keys::DB, "oracle");
        assert!(matches!(
            MigrationConfig::from_store(&store),
            Err(MigrationError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_from_store_rejects_bad_port() {
        let store = store().with_env_value(keys::PORT, "70000");
        assert!(matches!(
            MigrationConfig::from_store(&store),
            Err(MigrationError::Config(ConfigError::InvalidValue { .. }))
        ));

        let store = self::store().with_env_value(keys::PORT, "-1");
        assert!(MigrationConfig::from_store(&store).is_err());
    }

    #[test]
    fn test_postgres_defaults() {
        for sslmode in ["", "disable"] {
            let config = MigrationConfig::builder()
                .dialect(Dialect::Postgres)
                .sslmode(sslmode)
                .build()
                .with_dialect_defaults();

            assert_eq!(config.port, 5432);
            let expected = if sslmode.is_empty() { "require" } else { sslmode };
            assert_eq!(config.sslmode, expected);
        }
    }

    #[test]
    fn test_mysql_defaults() {
        for sslmode in ["", "skip-verify"] {
            let config = MigrationConfig::builder()
                .dialect(Dialect::Mysql)
                .sslmode(sslmode)
                .build()
                .with_dialect_defaults();

            assert_eq!(config.port, 3306);
            let expected = if sslmode.is_empty() { "true" } else { sslmode };
            assert_eq!(config.sslmode, expected);
        }
    }

    #[test]
    fn test_defaults_keep_configured_values() {
        let config = MigrationConfig::builder()
            .dialect(Dialect::Postgres)
            .user("bob")
            .host("h")
            .port(6543)
            .dbname("d")
            .sslmode("verify-full")
            .build()
            .with_dialect_defaults();

        assert_eq!(config.port, 6543);
        assert_eq!(config.sslmode, "verify-full");
        assert_eq!(config.user, "bob");
        assert_eq!(config.host, "h");
        assert_eq!(config.dbname, "d");
    }

    #[test]
    fn test_defaults_noop_without_dialect() {
        let config = MigrationConfig::default().with_dialect_defaults();
        assert_eq!(config.port, UNSET_PORT);
        assert!(config.sslmode.is_empty());
    }

    #[test]
    fn test_record_defaults_persists_to_store() {
        let mut store = store().with_file_value(keys::DB, "mysql");

        let config = MigrationConfig::from_store(&store)
            .unwrap()
            .with_dialect_defaults();
        config.record_defaults(&mut store);

        assert_eq!(store.get_int(keys::PORT).unwrap(), 3306);
        assert_eq!(store.get_string(keys::SSLMODE), "true");
        assert!(store.is_overridden(keys::PORT));
        assert!(store.is_overridden(keys::SSLMODE));
    }

    #[test]
    fn test_record_defaults_leaves_configured_keys() {
        let mut store = store()
            .with_file_value(keys::DB, "postgres")
            .with_env_value(keys::PORT, "6543");

        let config = MigrationConfig::from_store(&store)
            .unwrap()
            .with_dialect_defaults();
        config.record_defaults(&mut store);

        assert!(!store.is_overridden(keys::PORT));
        assert_eq!(store.get_int(keys::PORT).unwrap(), 6543);
        assert!(store.is_overridden(keys::SSLMODE));
        assert_eq!(store.get_string(keys::SSLMODE), "require");
    }

    #[test]
    fn test_record_defaults_skipped_without_dialect() {
        let mut store = store();
        let config = MigrationConfig::from_store(&store)
            .unwrap()
            .with_dialect_defaults();
        config.record_defaults(&mut store);

        assert!(!store.contains(keys::PORT));
        assert!(!store.contains(keys::SSLMODE));
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let config = MigrationConfig::builder().pass("hunter2").build();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
