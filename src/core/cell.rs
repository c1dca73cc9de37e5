// src/core/cell.rs

//! A single typed, lazily-resolved configuration value.
//!
//! Resolution order is fixed: explicit value, then the property override
//! (optionally interpolated, then converted), then the default. The first read
//! memoizes the result and freezes the cell.

use crate::core::{error::ConfigError, interpolator, paths, project::Project};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The declared type of a cell, used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int,
    FilePath,
    DirPath,
    StringList,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "a string",
            Self::Bool => "a boolean",
            Self::Int => "an integer",
            Self::FilePath => "a file path",
            Self::DirPath => "a directory path",
            Self::StringList => "a list of strings",
        };
        f.write_str(label)
    }
}

/// Where a cell's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Explicit,
    Property,
    Default,
    Unset,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Explicit => "explicit",
            Self::Property => "property",
            Self::Default => "default",
            Self::Unset => "unset",
        };
        f.write_str(label)
    }
}

/// Conversion from a raw property string into a cell's value type.
pub trait PropertyType: Clone + fmt::Debug {
    /// Parses `raw`. The error is a short reason, wrapped by the caller.
    fn parse_property(raw: &str) -> Result<Self, String>;

    /// Adjusts a value against the project root. Only paths use this.
    fn anchor(self, _root: &Path) -> Self {
        self
    }

    /// Renders the value for display.
    fn display_value(&self) -> String;
}

impl PropertyType for String {
    fn parse_property(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn display_value(&self) -> String {
        self.clone()
    }
}

impl PropertyType for bool {
    fn parse_property(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err("expected one of true/false, yes/no, on/off, 1/0".to_string()),
        }
    }

    fn display_value(&self) -> String {
        self.to_string()
    }
}

impl PropertyType for u32 {
    fn parse_property(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<u32>().map_err(|e| e.to_string())
    }

    fn display_value(&self) -> String {
        self.to_string()
    }
}

impl PropertyType for PathBuf {
    fn parse_property(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            return Err("path is empty".to_string());
        }
        Ok(Self::from(raw))
    }

    fn anchor(self, root: &Path) -> Self {
        paths::anchor(root, &self)
    }

    fn display_value(&self) -> String {
        self.display().to_string()
    }
}

impl PropertyType for Vec<String> {
    fn parse_property(raw: &str) -> Result<Self, String> {
        shlex::split(raw).ok_or_else(|| "unbalanced quotes or trailing escape".to_string())
    }

    fn display_value(&self) -> String {
        shlex::try_join(self.iter().map(String::as_str)).unwrap_or_else(|_| self.join(" "))
    }
}

/// A named configuration cell of type `T`.
pub struct Cell<T> {
    name: &'static str,
    kind: ValueKind,
    key: Option<&'static str>,
    interpolate: bool,
    explicit: Option<T>,
    default: Option<fn(&Project) -> T>,
    resolved: OnceLock<Option<T>>,
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("interpolate", &self.interpolate)
            .field("explicit", &self.explicit)
            .field("has_default", &self.default.is_some())
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl<T: PropertyType> Cell<T> {
    /// Creates a cell with no property key and no default.
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            key: None,
            interpolate: false,
            explicit: None,
            default: None,
            resolved: OnceLock::new(),
        }
    }

    /// Reads overrides from property `key`.
    #[must_use]
    pub fn from_property(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Expands `~` and `${...}` in the override before converting it.
    #[must_use]
    pub fn interpolated(mut self) -> Self {
        self.interpolate = true;
        self
    }

    /// Falls back to `default` when neither an explicit value nor an override exists.
    #[must_use]
    pub fn with_default(mut self, default: fn(&Project) -> T) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    /// Sets the explicit value. Fails once the cell has been read.
    pub fn set(&mut self, value: T) -> Result<(), ConfigError> {
        if self.resolved.get().is_some() {
            return Err(ConfigError::Finalized {
                name: self.name.to_string(),
            });
        }
        self.explicit = Some(value);
        Ok(())
    }

    /// Whether the cell has been read and is therefore frozen.
    pub fn is_finalized(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Resolves the cell, memoizing the result on success.
    pub fn get(&self, project: &Project) -> Result<Option<T>, ConfigError> {
        if let Some(value) = self.resolved.get() {
            return Ok(value.clone());
        }
        let value = resolve(
            self.explicit.as_ref(),
            self.raw_override(project)?,
            self.default.map(|default| default(project)),
            self.key.unwrap_or(self.name),
            self.kind,
        )?
        .map(|v| v.anchor(project.root()));

        log::trace!("Resolved '{}' to {:?}.", self.name, value);
        // A concurrent first read resolves to the same value, so losing the race is harmless.
        let _ = self.resolved.set(value.clone());
        Ok(value)
    }

    /// Resolves the cell and fails if it has no value.
    pub fn require(&self, project: &Project) -> Result<T, ConfigError> {
        self.get(project)?.ok_or_else(|| ConfigError::Missing {
            name: self.key.unwrap_or(self.name).to_string(),
        })
    }

    /// Reports which source the value would come from, without reading the cell.
    pub fn source(&self, project: &Project) -> ValueSource {
        if self.explicit.is_some() {
            ValueSource::Explicit
        } else if self.key.is_some_and(|key| project.properties().contains(key)) {
            ValueSource::Property
        } else if self.default.is_some() {
            ValueSource::Default
        } else {
            ValueSource::Unset
        }
    }

    fn raw_override(&self, project: &Project) -> Result<Option<String>, ConfigError> {
        if self.explicit.is_some() {
            return Ok(None);
        }
        let Some(key) = self.key else {
            return Ok(None);
        };
        match project.properties().get(key) {
            Some(raw) if self.interpolate => {
                interpolator::expand(key, raw, project.properties()).map(Some)
            }
            Some(raw) => Ok(Some(raw.to_string())),
            None => Ok(None),
        }
    }
}

/// Applies the precedence rule: explicit value, converted override, default.
pub fn resolve<T: PropertyType>(
    explicit: Option<&T>,
    raw_override: Option<String>,
    default: Option<T>,
    key: &str,
    kind: ValueKind,
) -> Result<Option<T>, ConfigError> {
    if let Some(value) = explicit {
        return Ok(Some(value.clone()));
    }
    if let Some(raw) = raw_override {
        return T::parse_property(&raw)
            .map(Some)
            .map_err(|reason| ConfigError::Conversion {
                key: key.to_string(),
                value: raw,
                expected: kind,
                reason,
            });
    }
    Ok(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::properties::PropertyStore;

    fn project_with(pairs: &[(&str, &str)]) -> Project {
        Project::new(
            "/work/project",
            PropertyStore::from_pairs(pairs.iter().copied()),
        )
    }

    fn timeout_cell() -> Cell<u32> {
        Cell::new("timeoutSeconds", ValueKind::Int)
            .from_property("helm.timeoutSeconds")
            .with_default(|_| 300)
    }

    // --- Precedence ---

    #[test]
    fn test_explicit_value_wins_over_property() {
        let project = project_with(&[("helm.timeoutSeconds", "600")]);
        let mut cell = timeout_cell();
        cell.set(42).unwrap();
        assert_eq!(cell.get(&project).unwrap(), Some(42));
        assert_eq!(cell.source(&project), ValueSource::Explicit);
    }

    #[test]
    fn test_explicit_value_wins_over_unconvertible_property() {
        let project = project_with(&[("helm.timeoutSeconds", "notanumber")]);
        let mut cell = timeout_cell();
        cell.set(42).unwrap();
        assert_eq!(cell.get(&project).unwrap(), Some(42));
    }

    #[test]
    fn test_property_wins_over_default() {
        let project = project_with(&[("helm.timeoutSeconds", "600")]);
        let cell = timeout_cell();
        assert_eq!(cell.get(&project).unwrap(), Some(600));
        assert_eq!(cell.source(&project), ValueSource::Property);
    }

    #[test]
    fn test_default_when_unset() {
        let project = project_with(&[]);
        let cell = timeout_cell();
        assert_eq!(cell.get(&project).unwrap(), Some(300));
        assert_eq!(cell.source(&project), ValueSource::Default);
    }

    #[test]
    fn test_unset_without_default_is_none_not_error() {
        let project = project_with(&[]);
        let cell: Cell<String> = Cell::new("host", ValueKind::String).from_property("helm.host");
        assert_eq!(cell.get(&project).unwrap(), None);
        assert_eq!(cell.source(&project), ValueSource::Unset);
    }

    #[test]
    fn test_require_fails_only_when_consumed() {
        let project = project_with(&[]);
        let cell: Cell<String> = Cell::new("host", ValueKind::String).from_property("helm.host");
        let error = cell.require(&project).unwrap_err();
        assert!(matches!(error, ConfigError::Missing { ref name } if name == "helm.host"));
    }

    // --- Conversion ---

    #[test]
    fn test_unconvertible_property_is_an_error() {
        let project = project_with(&[("helm.timeoutSeconds", "notanumber")]);
        let cell = timeout_cell();
        let error = cell.get(&project).unwrap_err();
        match error {
            ConfigError::Conversion {
                key,
                value,
                expected,
                ..
            } => {
                assert_eq!(key, "helm.timeoutSeconds");
                assert_eq!(value, "notanumber");
                assert_eq!(expected, ValueKind::Int);
            }
            other => panic!("Expected conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_read_does_not_freeze_the_cell() {
        let project = project_with(&[("helm.timeoutSeconds", "notanumber")]);
        let mut cell = timeout_cell();
        assert!(cell.get(&project).is_err());
        assert!(!cell.is_finalized());
        cell.set(10).unwrap();
        assert_eq!(cell.get(&project).unwrap(), Some(10));
    }

    #[test]
    fn test_bool_conversion() {
        assert_eq!(bool::parse_property("TRUE"), Ok(true));
        assert_eq!(bool::parse_property("yes"), Ok(true));
        assert_eq!(bool::parse_property("0"), Ok(false));
        assert_eq!(bool::parse_property(" off "), Ok(false));
        assert!(bool::parse_property("maybe").is_err());
        assert!(bool::parse_property("").is_err());
    }

    #[test]
    fn test_int_conversion_rejects_negative_values() {
        assert_eq!(u32::parse_property(" 120 "), Ok(120));
        assert!(u32::parse_property("-5").is_err());
    }

    #[test]
    fn test_list_conversion_uses_shell_words() {
        assert_eq!(
            Vec::<String>::parse_property("--tls --tls-ca-cert 'my ca.pem'").unwrap(),
            vec!["--tls", "--tls-ca-cert", "my ca.pem"]
        );
        assert!(Vec::<String>::parse_property("--set 'unterminated").is_err());
        assert!(Vec::<String>::parse_property("").unwrap().is_empty());
    }

    // --- Paths ---

    #[test]
    fn test_relative_dir_property_is_anchored_to_root() {
        let project = project_with(&[("helm.outputDir", "out/charts")]);
        let cell: Cell<PathBuf> = Cell::new("outputDir", ValueKind::DirPath)
            .from_property("helm.outputDir")
            .interpolated();
        assert_eq!(
            cell.get(&project).unwrap(),
            Some(PathBuf::from("/work/project/out/charts"))
        );
    }

    #[test]
    fn test_relative_explicit_path_is_anchored_to_root() {
        let project = project_with(&[]);
        let mut cell: Cell<PathBuf> = Cell::new("kubeConfig", ValueKind::FilePath);
        cell.set(PathBuf::from("kube/config")).unwrap();
        assert_eq!(
            cell.get(&project).unwrap(),
            Some(PathBuf::from("/work/project/kube/config"))
        );
    }

    #[test]
    fn test_interpolated_property_reads_other_properties() {
        let project = project_with(&[
            ("helm.outputDir", "${charts.base}/helm"),
            ("charts.base", "/srv"),
        ]);
        let cell: Cell<PathBuf> = Cell::new("outputDir", ValueKind::DirPath)
            .from_property("helm.outputDir")
            .interpolated();
        assert_eq!(cell.get(&project).unwrap(), Some(PathBuf::from("/srv/helm")));
    }

    #[test]
    fn test_non_interpolated_property_is_taken_verbatim() {
        let project = project_with(&[("helm.host", "${charts.base}"), ("charts.base", "/srv")]);
        let cell: Cell<String> = Cell::new("host", ValueKind::String).from_property("helm.host");
        assert_eq!(cell.get(&project).unwrap().as_deref(), Some("${charts.base}"));
    }

    // --- Lifecycle ---

    #[test]
    fn test_set_after_read_is_rejected() {
        let project = project_with(&[]);
        let mut cell = timeout_cell();
        assert_eq!(cell.get(&project).unwrap(), Some(300));
        assert!(cell.is_finalized());
        let error = cell.set(5).unwrap_err();
        assert!(matches!(error, ConfigError::Finalized { .. }));
        assert_eq!(cell.get(&project).unwrap(), Some(300));
    }

    #[test]
    fn test_resolve_function_precedence() {
        let explicit = String::from("explicit");
        assert_eq!(
            resolve(
                Some(&explicit),
                Some("override".into()),
                Some("default".into()),
                "k",
                ValueKind::String
            )
            .unwrap()
            .as_deref(),
            Some("explicit")
        );
        assert_eq!(
            resolve::<String>(
                None,
                Some("override".into()),
                Some("default".into()),
                "k",
                ValueKind::String
            )
            .unwrap()
            .as_deref(),
            Some("override")
        );
        assert_eq!(
            resolve::<String>(None, None, Some("default".into()), "k", ValueKind::String)
                .unwrap()
                .as_deref(),
            Some("default")
        );
        assert_eq!(
            resolve::<String>(None, None, None, "k", ValueKind::String).unwrap(),
            None
        );
    }
}
