// src/core/error.rs

use crate::core::cell::ValueKind;
use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid property override '{0}'. Expected 'key=value'.")]
    InvalidOverride(String),
    #[error("Property '{key}' cannot be used as a string: {reason}")]
    InvalidProperty { key: String, reason: String },
    #[error("Cannot convert value '{value}' of property '{key}' to {expected}: {reason}")]
    Conversion {
        key: String,
        value: String,
        expected: ValueKind,
        reason: String,
    },
    #[error(
        "Failed to interpolate property '{key}': variable '{var_name}' is not valid ({reason})"
    )]
    Interpolation {
        key: String,
        var_name: String,
        reason: String,
    },
    #[error("'{name}' has already been read and can no longer be changed.")]
    Finalized { name: String },
    #[error("A value for '{name}' is required but none was configured.")]
    Missing { name: String },
}
