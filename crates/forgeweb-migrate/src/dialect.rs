//! Dialect strategies: per-database defaults and connection string rendering.
//!
//! Renderers assume values are already safe for the target driver and do no
//! quoting or escaping.

use crate::config::{Dialect, MigrationConfig};

/// Defaults applied to unset connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectDefaults {
    /// Default port.
    pub port: u16,
    /// Default SSL / TLS mode.
    pub sslmode: &'static str,
}

/// Database-specific behaviour of the migrate pipeline.
pub trait DialectStrategy: Send + Sync + std::fmt::Debug {
    /// The dialect this strategy implements.
    fn dialect(&self) -> Dialect;

    /// Defaults for unset port and SSL mode.
    fn defaults(&self) -> DialectDefaults;

    /// Render a connection string. Pure and deterministic.
    fn render(&self, config: &MigrationConfig) -> String;
}

impl Dialect {
    /// Strategy for this dialect.
    #[must_use]
    pub fn strategy(self) -> &'static dyn DialectStrategy {
        match self {
            Self::Postgres => &PostgresDialect,
            Self::Mysql => &MySqlDialect,
        }
    }
}

/// PostgreSQL in the `lib/pq` key/value format:
/// `user=bob password=secret host=1.2.3.4 port=5432 dbname=mydb sslmode=verify-full`
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl DialectStrategy for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn defaults(&self) -> DialectDefaults {
        DialectDefaults {
            port: 5432,
            sslmode: "require",
        }
    }

    fn render(&self, config: &MigrationConfig) -> String {
        let mut parts = vec![format!("user={}", config.user)];

        if let Some(pass) = config.password() {
            parts.push(format!("password={pass}"));
        }

        parts.push(format!("host={}", config.host));
        parts.push(format!("port={}", config.port));
        parts.push(format!("dbname={}", config.dbname));

        if !config.sslmode.is_empty() {
            parts.push(format!("sslmode={}", config.sslmode));
        }

        parts.join(" ")
    }
}

/// MySQL in the `go-sql-driver/mysql` DSN format:
/// `user:pass@tcp(host:port)/dbname?tls=true`
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl DialectStrategy for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn defaults(&self) -> DialectDefaults {
        DialectDefaults {
            port: 3306,
            sslmode: "true",
        }
    }

    fn render(&self, config: &MigrationConfig) -> String {
        let mut dsn = config.user.clone();

        if let Some(pass) = config.password() {
            dsn.push(':');
            dsn.push_str(pass);
        }

        dsn.push_str(&format!(
            "@tcp({}:{})/{}",
            config.host, config.port, config.dbname
        ));

        if !config.sslmode.is_empty() {
            dsn.push_str("?tls=");
            dsn.push_str(&config.sslmode);
        }

        dsn
    }
}
