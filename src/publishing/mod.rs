// src/publishing/mod.rs

//! Chart publishing.
//!
//! A repository declaration becomes [`PublisherParams`], plain data that can be
//! encoded and handed to worker threads. Each worker turns its copy back into a
//! [`ChartPublisher`] and publishes one archive.

pub mod chart;
pub mod directory;
pub mod oci;
pub mod params;
pub mod repository;

pub use chart::ChartPackage;
pub use directory::DirectoryPublisher;
pub use oci::OciPublisher;
pub use params::PublisherParams;
pub use repository::RepositorySpec;

use crate::{CancellationToken, core::error::ConfigError, system::executor::ExecutionError};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("'{0}' is not a chart archive named <chart>-<version>.tgz.")]
    NotAChart(PathBuf),

    #[error("Chart directory '{0}' does not exist.")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to scan for charts: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error on '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(
        "A different archive is already published at '{target}'. Enable 'overwrite' to replace it."
    )]
    Conflict { target: PathBuf },

    #[error("'{first}' and '{second}' would both be published as '{file_name}'.")]
    DuplicateArchive {
        file_name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Registry URL '{0}' must start with 'oci://'.")]
    InvalidRegistry(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Failed to encode publisher parameters: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode publisher parameters: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("No repository named '{0}' is declared.")]
    UnknownRepository(String),

    #[error("Repository '{name}' is invalid: {reason}")]
    InvalidRepository { name: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What happened to a published chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published { location: String },
    /// An identical archive was already present.
    UpToDate { location: String },
}

impl PublishOutcome {
    pub fn location(&self) -> &str {
        match self {
            Self::Published { location } | Self::UpToDate { location } => location,
        }
    }
}

/// The closed set of publishers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartPublisher {
    Directory(DirectoryPublisher),
    Oci(OciPublisher),
}

impl ChartPublisher {
    pub fn publish(
        &self,
        chart: &ChartPackage,
        cancellation_token: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        if cancellation_token.load(Ordering::Relaxed) {
            return Err(ExecutionError::Cancelled.into());
        }
        log::debug!("Publishing '{}' with {:?}", chart.path.display(), self);
        match self {
            Self::Directory(publisher) => publisher.publish(chart),
            Self::Oci(publisher) => publisher.publish(chart, cancellation_token),
        }
    }
}

/// Fails if two charts share a file name, since they would land on the same target.
fn check_unique_file_names(charts: &[ChartPackage]) -> Result<(), PublishError> {
    let mut seen: BTreeMap<String, &ChartPackage> = BTreeMap::new();
    for chart in charts {
        let file_name = chart.file_name();
        if let Some(first) = seen.get(&file_name) {
            return Err(PublishError::DuplicateArchive {
                file_name,
                first: first.path.clone(),
                second: chart.path.clone(),
            });
        }
        seen.insert(file_name, chart);
    }
    Ok(())
}

/// Publishes every chart in parallel.
///
/// The parameters are encoded once; each worker decodes its own copy and builds
/// a fresh publisher. Results come back in the order of `charts`. Charts sharing
/// a file name are rejected before anything is published.
pub fn publish_all(
    params: &PublisherParams,
    charts: &[ChartPackage],
    cancellation_token: &CancellationToken,
) -> Result<Vec<Result<PublishOutcome, PublishError>>, PublishError> {
    check_unique_file_names(charts)?;
    let encoded = params.encode()?;
    log::debug!(
        "Publishing {} chart(s) with {} bytes of encoded parameters.",
        charts.len(),
        encoded.len()
    );

    Ok(charts
        .par_iter()
        .map(|chart| {
            let publisher = PublisherParams::decode(&encoded)?.create_publisher();
            publisher.publish(chart, cancellation_token)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;

    fn token() -> CancellationToken {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn test_publish_all_keeps_chart_order() {
        let source = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let charts: Vec<ChartPackage> = ["alpha-1.0.0.tgz", "beta-0.3.1.tgz", "gamma-2.1.0.tgz"]
            .iter()
            .map(|name| {
                let path = source.path().join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                ChartPackage::from_path(path).unwrap()
            })
            .collect();

        let params = PublisherParams::Directory {
            target_dir: repo.path().to_path_buf(),
            overwrite: false,
        };
        let results = publish_all(&params, &charts, &token()).unwrap();

        assert_eq!(results.len(), 3);
        for (chart, result) in charts.iter().zip(&results) {
            let outcome = result.as_ref().unwrap();
            assert!(matches!(outcome, PublishOutcome::Published { .. }));
            assert!(outcome.location().ends_with(&chart.file_name()));
        }
    }

    #[test]
    fn test_publish_all_reports_failures_per_chart() {
        let source = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join("taken-1.0.0.tgz"), b"old").unwrap();

        let mut charts = Vec::new();
        for (name, content) in [("taken-1.0.0.tgz", b"new"), ("fresh-1.0.0.tgz", b"abc")] {
            let path = source.path().join(name);
            fs::write(&path, content).unwrap();
            charts.push(ChartPackage::from_path(path).unwrap());
        }

        let params = PublisherParams::Directory {
            target_dir: repo.path().to_path_buf(),
            overwrite: false,
        };
        let results = publish_all(&params, &charts, &token()).unwrap();

        assert!(matches!(
            results.first(),
            Some(Err(PublishError::Conflict { .. }))
        ));
        assert!(matches!(results.get(1), Some(Ok(_))));
    }

    #[test]
    fn test_publish_all_rejects_duplicate_file_names() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let mut charts = Vec::new();
        for (dir, content) in [(&first, b"one"), (&second, b"two")] {
            let path = dir.path().join("web-1.0.0.tgz");
            fs::write(&path, content).unwrap();
            charts.push(ChartPackage::from_path(path).unwrap());
        }

        let params = PublisherParams::Directory {
            target_dir: repo.path().to_path_buf(),
            overwrite: false,
        };
        let result = publish_all(&params, &charts, &token());

        let duplicate = match result {
            Err(PublishError::DuplicateArchive { file_name, .. }) => Some(file_name),
            _ => None,
        };
        assert_eq!(duplicate.as_deref(), Some("web-1.0.0.tgz"));
        assert!(!repo.path().join("web-1.0.0.tgz").exists());
    }

    #[test]
    fn test_publish_all_stops_when_cancelled() {
        let source = TempDir::new().unwrap();
        let repo = TempDir::new().unwrap();
        let path = source.path().join("web-1.0.0.tgz");
        fs::write(&path, b"web").unwrap();
        let charts = vec![ChartPackage::from_path(path).unwrap()];
        let cancelled = token();
        cancelled.store(true, Ordering::SeqCst);

        let params = PublisherParams::Directory {
            target_dir: repo.path().to_path_buf(),
            overwrite: false,
        };
        let results = publish_all(&params, &charts, &cancelled).unwrap();

        assert!(matches!(
            results.first(),
            Some(Err(PublishError::Execution(ExecutionError::Cancelled)))
        ));
        assert!(!repo.path().join("web-1.0.0.tgz").exists());
    }
}
