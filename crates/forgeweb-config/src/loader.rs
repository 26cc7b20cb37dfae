//! Settings loading.

use crate::error::{ConfigError, Result};
use crate::store::SettingsStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix for environment variable overrides (`FORGEWEB_PORT`, ...).
pub const DEFAULT_ENV_PREFIX: &str = "FORGEWEB";

/// Mode used when none is selected explicitly.
pub const DEFAULT_MODE: &str = "dev";

/// Database settings file, relative to the application root.
pub const DATABASE_SETTINGS_FILE: &str = "config/database.toml";

/// Application server settings file, relative to the application root.
pub const APP_SETTINGS_FILE: &str = "config/config.toml";

/// Loads a mode-sectioned TOML settings file and overlays environment variables.
///
/// ```toml
/// [dev]
/// db = "postgres"
/// user = "app"
///
/// [prod]
/// db = "postgres"
/// host = "db.internal"
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    root: PathBuf,
    file: PathBuf,
    mode: String,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl SettingsLoader {
    /// Create a loader for `file` (relative to `root`).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, file: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file: file.into(),
            mode: DEFAULT_MODE.to_string(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            env_vars: None,
        }
    }

    /// Loader for `config/database.toml`.
    #[must_use]
    pub fn database(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DATABASE_SETTINGS_FILE)
    }

    /// Loader for `config/config.toml`.
    #[must_use]
    pub fn app(root: impl Into<PathBuf>) -> Self {
        Self::new(root, APP_SETTINGS_FILE)
    }

    /// Select the environment mode.
    #[must_use]
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set the environment variable prefix. `None` disables env overrides.
    #[must_use]
    pub fn env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    /// Use the given variables instead of the process environment.
    #[must_use]
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Full path of the settings file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.file)
    }

    /// Load the settings for the selected mode.
    pub fn load(self) -> Result<SettingsStore> {
        let mode = self.mode.trim().to_string();
        if mode.is_empty() {
            return Err(ConfigError::MissingEnvironment);
        }

        let path = self.path();
        let mut store = SettingsStore::new(mode.clone());

        if path.exists() {
            store.set_file_values(read_mode_table(&path, &mode)?);
            debug!(path = %path.display(), mode = %mode, "Loaded settings file");
        } else {
            warn!(
                path = %path.display(),
                "Settings file not found, using environment only"
            );
        }

        if let Some(prefix) = self.env_prefix {
            let vars = match self.env_vars {
                Some(vars) => vars,
                None => std::env::vars().collect(),
            };
            store.set_env_values(prefixed(&prefix, vars));
        }

        Ok(store)
    }
}

fn read_mode_table(path: &Path, mode: &str) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut document: toml::Table = content.parse().map_err(|e: toml::de::Error| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        }
    })?;

    match document.remove(mode) {
        Some(toml::Value::Table(table)) => Ok(table),
        _ => Err(ConfigError::UnknownEnvironment {
            mode: mode.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

fn prefixed(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> impl Iterator<Item = (String, String)> {
    let prefix = format!("{prefix}_");
    vars.into_iter().filter_map(move |(key, value)| {
        key.strip_prefix(&prefix)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (rest.to_ascii_lowercase(), value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE_TOML: &str = r#"
[dev]
db = "postgres"
user = "app"
host = "localhost"
dbname = "app_dev"

[prod]
db = "mysql"
host = "db.internal"
port = 3307
"#;

    fn write_settings(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join(DATABASE_SETTINGS_FILE), content).unwrap();
        dir
    }

    #[test]
    fn test_load_mode_table() {
        let dir = write_settings(DATABASE_TOML);

        let store = SettingsLoader::database(dir.path())
            .env_prefix(None)
            .load()
            .unwrap();
        assert_eq!(store.mode(), "dev");
        assert_eq!(store.get_string("db"), "postgres");
        assert_eq!(store.get_string("dbname"), "app_dev");
        assert_eq!(store.get_int("port").unwrap(), 0);

        let store = SettingsLoader::database(dir.path())
            .mode("prod")
            .env_prefix(None)
            .load()
            .unwrap();
        assert_eq!(store.get_string("db"), "mysql");
        assert_eq!(store.get_int("port").unwrap(), 3307);
        assert_eq!(store.get_string("user"), "");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = write_settings(DATABASE_TOML);

        let store = SettingsLoader::database(dir.path())
            .env_vars([
                ("FORGEWEB_HOST", "10.0.0.5"),
                ("FORGEWEB_PORT", "6432"),
                ("OTHER_HOST", "ignored"),
                ("FORGEWEB_", "ignored"),
            ])
            .load()
            .unwrap();

        assert_eq!(store.get_string("host"), "10.0.0.5");
        assert_eq!(store.get_int("port").unwrap(), 6432);
        assert_eq!(store.get_string("user"), "app");
    }

    #[test]
    fn test_unknown_environment() {
        let dir = write_settings(DATABASE_TOML);

        let result = SettingsLoader::database(dir.path())
            .mode("staging")
            .env_prefix(None)
            .load();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownEnvironment { ref mode, .. }) if mode == "staging"
        ));
    }

    #[test]
    fn test_missing_environment() {
        let dir = write_settings(DATABASE_TOML);

        let result = SettingsLoader::database(dir.path()).mode("  ").load();
        assert!(matches!(result, Err(ConfigError::MissingEnvironment)));
    }

    #[test]
    fn test_missing_file_uses_environment() {
        let dir = tempfile::tempdir().unwrap();

        let store = SettingsLoader::database(dir.path())
            .env_vars([("FORGEWEB_DB", "mysql")])
            .load()
            .unwrap();
        assert_eq!(store.get_string("db"), "mysql");
    }

    #[test]
    fn test_parse_error() {
        let dir = write_settings("[dev\nuser = ");

        let result = SettingsLoader::database(dir.path()).env_prefix(None).load();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
