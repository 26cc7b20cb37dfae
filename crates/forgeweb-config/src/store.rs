//! Keyed settings store.

use crate::error::{ConfigError, Result};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use toml::Value;

/// Resolved settings for one environment mode.
///
/// Lookups consult, in order:
/// 1. explicit values written with [`SettingsStore::set`] (flags, persisted defaults)
/// 2. prefixed environment variables captured when the store was loaded
/// 3. the mode's table in the settings file
///
/// Keys are case-insensitive and stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    mode: String,
    file: BTreeMap<String, Value>,
    env: BTreeMap<String, String>,
    overrides: BTreeMap<String, Value>,
}

impl SettingsStore {
    /// Create an empty store for a mode.
    #[must_use]
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            ..Default::default()
        }
    }

    /// Add a value as if it came from the settings file.
    #[must_use]
    pub fn with_file_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.file.insert(normalize(key), value.into());
        self
    }

    /// Add a value as if it came from the environment.
    #[must_use]
    pub fn with_env_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.insert(normalize(key), value.into());
        self
    }

    pub(crate) fn set_file_values(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
        self.file
            .extend(values.into_iter().map(|(k, v)| (normalize(&k), v)));
    }

    pub(crate) fn set_env_values(&mut self, values: impl IntoIterator<Item = (String, String)>) {
        self.env
            .extend(values.into_iter().map(|(k, v)| (normalize(&k), v)));
    }

    /// The environment mode these settings were resolved for.
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Write a value that takes precedence over every other source.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.overrides.insert(normalize(key), value.into());
    }

    /// Whether any source provides the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether the key was written with [`SettingsStore::set`].
    #[must_use]
    pub fn is_overridden(&self, key: &str) -> bool {
        self.overrides.contains_key(&normalize(key))
    }

    /// All keys known to any source.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<String> {
        self.overrides
            .keys()
            .chain(self.env.keys())
            .chain(self.file.keys())
            .cloned()
            .collect()
    }

    /// Effective raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let key = normalize(key);
        if let Some(value) = self.overrides.get(&key) {
            return Some(value.clone());
        }
        if let Some(value) = self.env.get(&key) {
            return Some(Value::String(value.clone()));
        }
        self.file.get(&key).cloned()
    }

    /// Read a value as a string. Missing keys read as the empty string.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            None => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        }
    }

    /// Read a value as an integer. Missing keys and empty strings read as `0`.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get(key) {
            None => Ok(0),
            Some(Value::Integer(i)) => Ok(i),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed
                    .parse()
                    .map_err(|_| ConfigError::invalid_value(key, "integer", s))
            }
            Some(Value::Float(f)) if f.fract() == 0.0 => Ok(f as i64),
            Some(other) => Err(ConfigError::invalid_value(key, "integer", other.to_string())),
        }
    }

    /// Read a value as a boolean. Missing keys read as `false`.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Boolean(b)) => Ok(b),
            Some(Value::String(s)) => parse_bool(&s)
                .ok_or_else(|| ConfigError::invalid_value(key, "boolean", s)),
            Some(Value::Integer(0)) => Ok(false),
            Some(Value::Integer(1)) => Ok(true),
            Some(other) => Err(ConfigError::invalid_value(key, "boolean", other.to_string())),
        }
    }

    /// Deserialize the effective settings into a typed structure.
    ///
    /// Environment values are coerced to booleans or numbers when they parse
    /// as such, so `FORGEWEB_ASSETS_NO_CACHE=true` fills a `bool` field.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let table: toml::Table = self
            .keys()
            .into_iter()
            .filter_map(|key| {
                let value = match self.overrides.get(&key) {
                    Some(value) => value.clone(),
                    None => match self.env.get(&key) {
                        Some(raw) => coerce(raw),
                        None => self.file.get(&key)?.clone(),
                    },
                };
                Some((key, value))
            })
            .collect();

        Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Deserialize(e.to_string()))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn coerce(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(b) = trimmed.parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}
