// src/core/interpolator.rs

//! Shell-style expansion of raw property strings.
//!
//! `~` expands to the user's home directory, `$NAME` and `${NAME}` expand to the
//! property `NAME` if the store has it, otherwise to the environment variable
//! `NAME`. Dotted property names need the braced form (`${chart.version}`).
//! Unknown variables are left untouched.

use crate::core::{error::ConfigError, paths, properties::PropertyStore};
use std::env::{self, VarError};

/// Expands `raw`, the value of property `key`, against `store` and the environment.
pub fn expand(key: &str, raw: &str, store: &PropertyStore) -> Result<String, ConfigError> {
    expand_with_env(key, raw, store, |name| env::var(name))
}

/// Same as [`expand`], with the environment lookup supplied by the caller.
pub fn expand_with_env<F>(
    key: &str,
    raw: &str,
    store: &PropertyStore,
    mut env_lookup: F,
) -> Result<String, ConfigError>
where
    F: FnMut(&str) -> Result<String, VarError>,
{
    check_braces(key, raw)?;

    let context = |name: &str| -> Result<Option<String>, VarError> {
        if let Some(value) = store.get(name) {
            log::trace!("Interpolating '{}' from properties.", name);
            return Ok(Some(value.to_string()));
        }
        match env_lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e) => Err(e),
        }
    };

    let expanded = shellexpand::full_with_context(raw, paths::home_dir_string, context)
        .map_err(|e| ConfigError::Interpolation {
            key: key.to_string(),
            var_name: e.var_name.clone(),
            reason: e.cause.to_string(),
        })?;

    if expanded != raw {
        log::debug!("Property '{}' interpolated to '{}'.", key, expanded);
    }
    Ok(expanded.into_owned())
}

/// Rejects a `${` that is never closed, which the expander would pass through verbatim.
fn check_braces(key: &str, raw: &str) -> Result<(), ConfigError> {
    let Some(start) = raw.rfind("${") else {
        return Ok(());
    };
    let rest = raw.get(start + 2..).unwrap_or_default();
    if rest.contains('}') {
        return Ok(());
    }
    Err(ConfigError::Interpolation {
        key: key.to_string(),
        var_name: rest.to_string(),
        reason: "missing closing '}'".to_string(),
    })
}
