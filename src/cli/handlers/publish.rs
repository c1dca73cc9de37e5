// src/cli/handlers/publish.rs

use crate::{
    core::extension::HelmExtension,
    publishing::{
        self, ChartPackage, PublishError, PublishOutcome, RepositorySpec, chart,
        repository::repository_names,
    },
    system::executor::ExecutionError,
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Publishes chart archives to a repository declared in helmw.toml."
)]
struct PublishArgs {
    /// Name of a `[repositories.<name>]` entry.
    #[arg(long, value_name = "NAME")]
    repo: String,

    /// Chart archives to publish. Defaults to every archive in the output directory.
    charts: Vec<PathBuf>,
}

/// The main handler for the `publish` action.
pub fn handle(extension: HelmExtension, args: Vec<String>) -> Result<()> {
    let publish_args = PublishArgs::try_parse_from(&args)?;

    let params = RepositorySpec::find(&extension, &publish_args.repo)
        .and_then(|spec| spec.into_params(&extension))
        .with_context(|| {
            let mut declared = repository_names(&extension);
            declared.sort();
            format!(
                t!("publish.error.repository"),
                name = publish_args.repo,
                declared = declared.join(", ")
            )
        })?;

    let charts = if publish_args.charts.is_empty() {
        let dir = extension.output_dir()?;
        chart::discover(&dir)?
    } else {
        publish_args
            .charts
            .iter()
            .map(|path| ChartPackage::from_path(extension.project().resolve_path(path)))
            .collect::<Result<Vec<_>, _>>()?
    };

    if charts.is_empty() {
        println!("{}", t!("publish.no_charts").yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            t!("publish.header"),
            count = charts.len(),
            repo = publish_args.repo
        )
        .bold()
    );

    let results = publishing::publish_all(&params, &charts, extension.cancellation_token())?;
    let mut failures = 0;
    for (package, result) in charts.iter().zip(results) {
        let label = format!("{}-{}", package.name, package.version);
        match result {
            Ok(PublishOutcome::Published { location }) => {
                println!("  {} {} -> {}", "✓".green(), label, location);
            }
            Ok(PublishOutcome::UpToDate { location }) => {
                println!(
                    "  {} {} {}",
                    "=".dimmed(),
                    label,
                    format!("({}: {})", t!("publish.status.up_to_date"), location).dimmed()
                );
            }
            Err(PublishError::Execution(ExecutionError::Cancelled)) => {
                return Err(ExecutionError::Cancelled.into());
            }
            Err(e) => {
                failures += 1;
                eprintln!("  {} {}: {}", "✗".red(), label, e);
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(t!("publish.error.failures"), count = failures));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{project::Project, properties::ConfigFile};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn extension_in(root: &Path, content: &str) -> HelmExtension {
        let file = ConfigFile::parse(content, "helmw.toml").unwrap();
        HelmExtension::new(
            Project::new(root, file.properties).with_repositories(file.repositories),
        )
    }

    #[test]
    fn test_publishes_discovered_charts_to_directory_repo() {
        let root = TempDir::new().unwrap();
        let charts_dir = root.path().join("build/helm/charts");
        fs::create_dir_all(&charts_dir).unwrap();
        fs::write(charts_dir.join("web-1.0.0.tgz"), b"web").unwrap();
        fs::write(charts_dir.join("api-0.2.0.tgz"), b"api").unwrap();

        let ext = extension_in(
            root.path(),
            "[repositories.local]\ntype = \"directory\"\npath = \"repo\"\n",
        );
        handle(ext, vec!["--repo".to_string(), "local".to_string()]).unwrap();

        assert!(root.path().join("repo/web-1.0.0.tgz").is_file());
        assert!(root.path().join("repo/api-0.2.0.tgz").is_file());
    }

    #[test]
    fn test_explicit_chart_paths_are_relative_to_root() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("tool-3.1.4.tgz"), b"tool").unwrap();

        let ext = extension_in(
            root.path(),
            "[repositories.local]\ntype = \"directory\"\npath = \"repo\"\n",
        );
        handle(
            ext,
            vec![
                "--repo".to_string(),
                "local".to_string(),
                "tool-3.1.4.tgz".to_string(),
            ],
        )
        .unwrap();

        assert!(root.path().join("repo/tool-3.1.4.tgz").is_file());
    }

    #[test]
    fn test_unknown_repository_fails() {
        let root = TempDir::new().unwrap();
        let ext = extension_in(root.path(), "");
        let err = handle(ext, vec!["--repo".to_string(), "nowhere".to_string()]).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_conflicting_archive_fails_the_action() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("repo")).unwrap();
        fs::write(root.path().join("repo/web-1.0.0.tgz"), b"old").unwrap();
        fs::write(root.path().join("web-1.0.0.tgz"), b"new").unwrap();

        let ext = extension_in(
            root.path(),
            "[repositories.local]\ntype = \"directory\"\npath = \"repo\"\n",
        );
        let result = handle(
            ext,
            vec![
                "--repo".to_string(),
                "local".to_string(),
                "web-1.0.0.tgz".to_string(),
            ],
        );
        assert!(result.is_err());
    }
}
