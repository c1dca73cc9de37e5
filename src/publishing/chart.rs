// src/publishing/chart.rs

use crate::{constants::CHART_ARCHIVE_EXTENSION, publishing::PublishError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    // `<name>-<semver>.tgz`, where the name itself may contain dashes.
    static ref CHART_FILE_RE: Regex =
        Regex::new(r"^(?P<name>.+?)-(?P<version>v?\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.+-]*)?)\.tgz$")
            .expect("chart file pattern is valid");
}

/// A packaged chart archive on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChartPackage {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

impl ChartPackage {
    /// Identifies a chart archive from its file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PublishError::NotAChart(path.to_path_buf()))?;
        let captures = CHART_FILE_RE
            .captures(file_name)
            .ok_or_else(|| PublishError::NotAChart(path.to_path_buf()))?;
        let group = |name: &str| captures.name(name).map(|m| m.as_str().to_string());

        match (group("name"), group("version")) {
            (Some(name), Some(version)) => Ok(Self {
                name,
                version,
                path: path.to_path_buf(),
            }),
            _ => Err(PublishError::NotAChart(path.to_path_buf())),
        }
    }

    /// The archive's file name, e.g. `mychart-1.2.3.tgz`.
    pub fn file_name(&self) -> String {
        format!("{}-{}.{}", self.name, self.version, CHART_ARCHIVE_EXTENSION)
    }
}

/// Finds every chart archive below `dir`, sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<ChartPackage>, PublishError> {
    if !dir.is_dir() {
        return Err(PublishError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut charts = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_archive = entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(CHART_ARCHIVE_EXTENSION);
        if !is_archive {
            continue;
        }
        match ChartPackage::from_path(path) {
            Ok(chart) => charts.push(chart),
            Err(_) => log::warn!(
                "Skipping '{}': not named <chart>-<version>.tgz.",
                path.display()
            ),
        }
    }
    log::debug!("Found {} chart(s) in '{}'.", charts.len(), dir.display());
    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_splits_name_and_version() {
        let chart = ChartPackage::from_path("/out/my-web-app-1.2.3.tgz").unwrap();
        assert_eq!(chart.name, "my-web-app");
        assert_eq!(chart.version, "1.2.3");
        assert_eq!(chart.file_name(), "my-web-app-1.2.3.tgz");
    }

    #[test]
    fn test_from_path_accepts_prerelease_versions() {
        let chart = ChartPackage::from_path("nginx-0.1.0-rc.1+build.5.tgz").unwrap();
        assert_eq!(chart.name, "nginx");
        assert_eq!(chart.version, "0.1.0-rc.1+build.5");
    }

    #[test]
    fn test_from_path_rejects_other_files() {
        assert!(ChartPackage::from_path("values.yaml").is_err());
        assert!(ChartPackage::from_path("nginx.tgz").is_err());
        assert!(ChartPackage::from_path("nginx-latest.tgz").is_err());
    }

    #[test]
    fn test_discover_finds_archives_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b-chart-0.2.0.tgz"), b"b").unwrap();
        fs::write(dir.path().join("nested/a-chart-0.1.0.tgz"), b"a").unwrap();
        fs::write(dir.path().join("README.md"), b"readme").unwrap();
        fs::write(dir.path().join("broken.tgz"), b"x").unwrap();

        let charts = discover(dir.path()).unwrap();
        let names: Vec<&str> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a-chart"));
        assert!(names.contains(&"b-chart"));
    }

    #[test]
    fn test_discover_requires_existing_directory() {
        let dir = TempDir::new().unwrap();
        let result = discover(&dir.path().join("missing"));
        assert!(matches!(result, Err(PublishError::DirectoryNotFound(_))));
    }
}
