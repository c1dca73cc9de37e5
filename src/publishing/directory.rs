// src/publishing/directory.rs

use crate::publishing::{ChartPackage, PublishError, PublishOutcome};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const DIGEST_TRUNCATE_LENGTH: usize = 16; // 16 bytes = 32 hex characters

/// Publishes chart archives by copying them into a local directory repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPublisher {
    target_dir: PathBuf,
    overwrite: bool,
}

impl DirectoryPublisher {
    pub fn new(target_dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            target_dir: target_dir.into(),
            overwrite,
        }
    }

    /// Copies the archive, unless an identical one is already there.
    ///
    /// A differing archive at the target is only replaced when `overwrite` is set.
    pub fn publish(&self, chart: &ChartPackage) -> Result<PublishOutcome, PublishError> {
        fs::create_dir_all(&self.target_dir).map_err(|e| PublishError::Io {
            path: self.target_dir.clone(),
            source: e,
        })?;
        let target = self.target_dir.join(chart.file_name());

        if copy_new(&chart.path, &target)? {
            return Ok(PublishOutcome::Published {
                location: target.display().to_string(),
            });
        }

        let existing = content_digest(&target)?;
        let incoming = content_digest(&chart.path)?;
        if existing == incoming {
            log::debug!(
                "'{}' is already published with digest {}.",
                target.display(),
                existing
            );
            return Ok(PublishOutcome::UpToDate {
                location: target.display().to_string(),
            });
        }
        if !self.overwrite {
            return Err(PublishError::Conflict { target });
        }

        log::debug!("Overwriting '{}'.", target.display());
        fs::copy(&chart.path, &target).map_err(|e| PublishError::Io {
            path: chart.path.clone(),
            source: e,
        })?;
        Ok(PublishOutcome::Published {
            location: target.display().to_string(),
        })
    }
}

/// Copies `source` to `target` only if `target` does not exist yet.
///
/// Returns `false` when the target already exists, including when another
/// writer created it first.
fn copy_new(source: &Path, target: &Path) -> Result<bool, PublishError> {
    let mut input = File::open(source).map_err(|e| PublishError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    let mut output = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(PublishError::Io {
                path: target.to_path_buf(),
                source: e,
            });
        }
    };
    io::copy(&mut input, &mut output).map_err(|e| PublishError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Truncated blake3 digest of a file's contents, hex-encoded.
fn content_digest(path: &Path) -> Result<String, PublishError> {
    let content = fs::read(path).map_err(|e| PublishError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let hash = blake3::hash(&content);
    Ok(hex::encode(
        hash.as_bytes().get(..DIGEST_TRUNCATE_LENGTH).unwrap_or_default(),
    ))
}
