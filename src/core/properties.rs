// src/core/properties.rs

//! The external override store: an immutable map of string-keyed properties.
//!
//! Properties come from the project's `helmw.toml` (nested tables flattened into
//! dotted keys) and from command-line `-P key=value` overrides, which win.

use crate::constants::REPOSITORIES_TABLE;
use crate::core::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use toml::{Table, Value};

/// Read-only store of raw property strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    entries: BTreeMap<String, String>,
}

impl PropertyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from key/value pairs. Later pairs replace earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a new store where `overrides` replace any existing entries.
    #[must_use]
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in overrides {
            log::trace!("Property override: {} = {}", key, value);
            self.entries.insert(key, value);
        }
        self
    }

    /// Looks up the raw value of a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the store has an entry for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The parsed contents of a project configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub properties: PropertyStore,
    /// The reserved `[repositories]` table, left unparsed.
    pub repositories: Table,
}

impl ConfigFile {
    /// Reads and parses a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading properties from '{}'.", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses configuration file content. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut table: Table = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
            path: origin.to_string(),
            source: e,
        })?;

        let repositories = match table.remove(REPOSITORIES_TABLE) {
            Some(Value::Table(repos)) => repos,
            Some(_) => {
                return Err(ConfigError::InvalidProperty {
                    key: REPOSITORIES_TABLE.to_string(),
                    reason: "expected a table of repositories".to_string(),
                });
            }
            None => Table::new(),
        };

        let mut entries = BTreeMap::new();
        flatten_table("", &table, &mut entries)?;

        Ok(Self {
            properties: PropertyStore { entries },
            repositories,
        })
    }
}

/// Parses a `key=value` command-line override. The value may be empty.
pub fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

fn flatten_table(
    prefix: &str,
    table: &Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            Value::Table(nested) => flatten_table(&key, nested, out)?,
            other => {
                let text = value_to_string(&key, other)?;
                out.insert(key, text);
            }
        }
    }
    Ok(())
}

fn value_to_string(key: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        // Arrays become a shell-quoted word list, which list cells split back apart.
        Value::Array(items) => {
            let words = items
                .iter()
                .map(|item| match item {
                    Value::Array(_) | Value::Table(_) => Err(ConfigError::InvalidProperty {
                        key: key.to_string(),
                        reason: "nested arrays and tables are not supported in lists".to_string(),
                    }),
                    scalar => value_to_string(key, scalar),
                })
                .collect::<Result<Vec<String>, ConfigError>>()?;
            shlex::try_join(words.iter().map(String::as_str)).map_err(|e| {
                ConfigError::InvalidProperty {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })
        }
        Value::Table(_) => Err(ConfigError::InvalidProperty {
            key: key.to_string(),
            reason: "tables cannot be used as values".to_string(),
        }),
    }
}
