// src/publishing/repository.rs

use crate::{
    core::extension::HelmExtension,
    publishing::{PublishError, PublisherParams},
};
use serde::Deserialize;
use std::path::PathBuf;

/// A publishing repository as declared in `[repositories.<name>]`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum RepositorySpec {
    Directory {
        path: PathBuf,
        #[serde(default)]
        overwrite: bool,
    },
    Oci {
        url: String,
    },
}

impl RepositorySpec {
    /// Looks up and parses the repository called `name`.
    pub fn find(extension: &HelmExtension, name: &str) -> Result<Self, PublishError> {
        let raw = extension
            .project()
            .repositories()
            .get(name)
            .ok_or_else(|| PublishError::UnknownRepository(name.to_string()))?;
        raw.clone()
            .try_into()
            .map_err(|e: toml::de::Error| PublishError::InvalidRepository {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Turns the declaration into publisher parameters, snapshotting what the
    /// publisher will need from the extension.
    pub fn into_params(self, extension: &HelmExtension) -> Result<PublisherParams, PublishError> {
        Ok(match self {
            Self::Directory { path, overwrite } => PublisherParams::Directory {
                target_dir: extension.project().resolve_path(path),
                overwrite,
            },
            Self::Oci { url } => PublisherParams::Oci {
                registry_url: url,
                options: extension.global_options()?,
            },
        })
    }
}

/// Names of all declared repositories.
pub fn repository_names(extension: &HelmExtension) -> Vec<String> {
    extension.project().repositories().keys().cloned().collect()
}
