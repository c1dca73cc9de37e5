// src/cli/handlers/commons.rs

// Shared helpers for the action handlers.

use anyhow::{Context, Result, anyhow};

use crate::{
    CancellationToken,
    cli::Cli,
    core::{
        extension::HelmExtension,
        project::{Project, ProjectOptions},
        properties::parse_override,
    },
};

/// Loads the project described by the global CLI options and wraps it in a
/// `HelmExtension` that shares `cancellation_token`.
pub fn load_extension(cli: &Cli, cancellation_token: CancellationToken) -> Result<HelmExtension> {
    let overrides = cli
        .properties
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let project = Project::load(ProjectOptions {
        root: cli.project_dir.clone(),
        build_dir: cli.build_dir.clone(),
        config_file: cli.config.clone(),
        overrides,
    })
    .context(t!("commons.error.load_project"))?;

    log::debug!(
        "Project root '{}', config file {:?}, {} propert(y/ies).",
        project.root().display(),
        project.config_file(),
        project.properties().len()
    );

    Ok(HelmExtension::new(project).with_cancellation_token(cancellation_token))
}

/// Splits a `KEY=VALUE` environment assignment.
pub fn parse_env_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(anyhow!(t!("commons.error.invalid_env"), value = raw)),
    }
}
