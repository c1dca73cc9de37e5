// src/core/project.rs

use crate::{
    constants::{DEFAULT_BUILD_DIR, PROJECT_CONFIG_FILENAME},
    core::{
        error::ConfigError,
        paths,
        properties::{ConfigFile, PropertyStore},
    },
};
use std::path::{Path, PathBuf};
use toml::Table;

/// Inputs for loading a [`Project`] from disk.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    /// Project root. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Build directory, relative to the root unless absolute.
    pub build_dir: Option<PathBuf>,
    /// Configuration file. Defaults to `helmw.toml` in the root, if present.
    pub config_file: Option<PathBuf>,
    /// `key=value` overrides that win over the configuration file.
    pub overrides: Vec<(String, String)>,
}

/// The project a build invocation runs against: its directories and properties.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    build_dir: PathBuf,
    properties: PropertyStore,
    repositories: Table,
    config_file: Option<PathBuf>,
}

impl Project {
    /// Creates a project rooted at `root` with the default build directory.
    pub fn new(root: impl Into<PathBuf>, properties: PropertyStore) -> Self {
        let root = root.into();
        let build_dir = root.join(DEFAULT_BUILD_DIR);
        Self {
            root,
            build_dir,
            properties,
            repositories: Table::new(),
            config_file: None,
        }
    }

    /// Replaces the build directory. Relative paths are resolved against the root.
    #[must_use]
    pub fn with_build_dir(mut self, build_dir: impl AsRef<Path>) -> Self {
        self.build_dir = paths::anchor(&self.root, build_dir.as_ref());
        self
    }

    /// Replaces the declared publishing repositories.
    #[must_use]
    pub fn with_repositories(mut self, repositories: Table) -> Self {
        self.repositories = repositories;
        self
    }

    /// Loads the configuration file (if any), applies overrides and builds the project.
    pub fn load(options: ProjectOptions) -> Result<Self, ConfigError> {
        let root = match options.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let root = dunce::canonicalize(&root)?;

        let config_file = match options.config_file {
            Some(path) => Some(paths::anchor(&root, &path)),
            None => {
                let candidate = root.join(PROJECT_CONFIG_FILENAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let file = match &config_file {
            Some(path) => ConfigFile::load(path)?,
            None => {
                log::debug!("No configuration file found in '{}'.", root.display());
                ConfigFile::default()
            }
        };

        let properties = file.properties.with_overrides(options.overrides);
        log::debug!(
            "Project '{}' loaded with {} properties.",
            root.display(),
            properties.len()
        );

        let mut project = Self::new(root, properties).with_repositories(file.repositories);
        project.config_file = config_file;
        if let Some(build_dir) = options.build_dir {
            project = project.with_build_dir(build_dir);
        }
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// The raw `[repositories]` table of the configuration file.
    pub fn repositories(&self) -> &Table {
        &self.repositories
    }

    /// The configuration file the properties were read from, if any.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Resolves a path relative to the project root.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        paths::anchor(&self.root, path.as_ref())
    }
}
