// src/publishing/params.rs

use crate::{
    models::GlobalHelmOptions,
    publishing::{ChartPublisher, DirectoryPublisher, OciPublisher, PublishError},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything needed to build a publisher, as plain serializable data.
///
/// Parameters carry no live handles, so they can be encoded, shipped to a
/// worker and turned into a publisher there.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PublisherParams {
    /// Copy archives into a local directory repository.
    Directory {
        target_dir: PathBuf,
        overwrite: bool,
    },
    /// Push archives to an OCI registry with `helm push`.
    Oci {
        registry_url: String,
        options: GlobalHelmOptions,
    },
}

impl PublisherParams {
    /// Builds the publisher these parameters describe.
    pub fn create_publisher(&self) -> ChartPublisher {
        match self {
            Self::Directory {
                target_dir,
                overwrite,
            } => ChartPublisher::Directory(DirectoryPublisher::new(target_dir, *overwrite)),
            Self::Oci {
                registry_url,
                options,
            } => ChartPublisher::Oci(OciPublisher::new(registry_url, options.clone())),
        }
    }

    /// Encodes the parameters for transfer to a worker.
    pub fn encode(&self) -> Result<Vec<u8>, PublishError> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    /// Decodes parameters produced by [`PublisherParams::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, PublishError> {
        let (params, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(params)
    }
}
