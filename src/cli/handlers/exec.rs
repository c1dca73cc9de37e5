// src/cli/handlers/exec.rs

use crate::{
    cli::handlers::commons,
    core::extension::HelmExtension,
    system::exec_provider::HelmExecProvider,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Runs a Helm command with the project's Helm configuration."
)]
struct ExecArgs {
    /// Helm command, e.g. `install` or `repo`.
    command: String,

    /// Optional subcommand, e.g. `add` in `helm repo add`.
    subcommand: Option<String>,

    /// Add `--kube-context` and `--timeout` for commands that talk to the cluster.
    #[arg(long)]
    server: bool,

    /// Do not fail when Helm exits with a non-zero code.
    #[arg(long)]
    ignore_exit: bool,

    /// Working directory, relative to the project root unless absolute.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Extra environment variable for the Helm process. May be repeated.
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Pass `--debug` to Helm.
    #[arg(long)]
    debug: bool,

    /// Kubernetes context (implies nothing unless `--server` is given).
    #[arg(long, value_name = "CTX")]
    kube_context: Option<String>,

    /// Timeout in seconds (implies nothing unless `--server` is given).
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u32>,

    /// Arguments passed to Helm after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// The main handler for the `exec` action.
///
/// Flags given here are explicit values, so they win over any property.
pub fn handle(mut extension: HelmExtension, args: Vec<String>) -> Result<()> {
    let exec_args = ExecArgs::try_parse_from(&args)?;

    if exec_args.debug {
        extension.set_debug(true)?;
    }
    if let Some(context) = &exec_args.kube_context {
        extension.set_kube_context(context.clone())?;
    }
    if let Some(timeout) = exec_args.timeout {
        extension.set_timeout_seconds(timeout)?;
    }

    let env = exec_args
        .env
        .iter()
        .map(|raw| commons::parse_env_pair(raw))
        .collect::<Result<Vec<_>>>()?;
    let server = if exec_args.server {
        Some(extension.server_options()?)
    } else {
        None
    };
    let working_dir = exec_args
        .cwd
        .as_ref()
        .map(|dir| extension.project().resolve_path(dir));

    let helm_command = match &exec_args.subcommand {
        Some(sub) => format!("{} {}", exec_args.command, sub),
        None => exec_args.command.clone(),
    };

    let result = extension
        .exec_helm(
            &exec_args.command,
            exec_args.subcommand.as_deref(),
            |spec| {
                if let Some(server) = &server {
                    spec.server_options(server);
                }
                if let Some(dir) = &working_dir {
                    spec.working_dir(dir);
                }
                for (key, value) in env {
                    spec.env(key, value);
                }
                if exec_args.ignore_exit {
                    spec.ignore_exit_value();
                }
                spec.args(exec_args.args.iter().cloned());
            },
        )
        .with_context(|| format!(t!("exec.error.failed"), command = helm_command))?;

    if !result.is_success() {
        let code = result
            .exit_code
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        eprintln!(
            "{}",
            format!(t!("exec.warn.ignored_exit"), command = helm_command, code = code).yellow()
        );
    }
    Ok(())
}
