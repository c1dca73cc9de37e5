// src/bin/helmw.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use helmwright::{
    CancellationToken,
    cli::{Cli, handlers},
    core::extension::HelmExtension,
    publishing::PublishError,
    system::{exec_provider::HelmError, executor::ExecutionError},
    t,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// --- Command Definition and Registry ---

/// An action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(HelmExtension, Vec<String>) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "config",
        aliases: &["info"],
        handler: handlers::config::handle,
    },
    CommandDefinition {
        name: "exec",
        aliases: &["x"],
        handler: handlers::exec::handle,
    },
    CommandDefinition {
        name: "publish",
        aliases: &[],
        handler: handlers::publish::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Whether the error chain ends in an interrupted Helm process.
fn is_interrupted(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        let execution = cause.downcast_ref::<ExecutionError>().or_else(|| {
            match cause.downcast_ref::<HelmError>() {
                Some(HelmError::Execution(e)) => Some(e),
                _ => match cause.downcast_ref::<PublishError>() {
                    Some(PublishError::Execution(e)) => Some(e),
                    _ => None,
                },
            }
        });
        matches!(
            execution,
            Some(ExecutionError::Cancelled | ExecutionError::NonZeroExitStatus { code: None, .. })
        )
    })
}

fn main() {
    env_logger::init();

    // Ctrl-C raises the token; running Helm processes are killed by the executor.
    let cancellation_token = Arc::new(AtomicBool::new(false));
    let handler_token = cancellation_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_token.store(true, Ordering::SeqCst);
    }) {
        log::warn!("Could not install the Ctrl-C handler: {}", e);
    }

    if let Err(e) = run_cli(Cli::parse(), cancellation_token) {
        if is_interrupted(&e) {
            std::process::exit(130);
        }

        eprintln!("\n{}: {:#}", t!("cli.label.error").red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolves the action, loads the project and hands over to the handler.
fn run_cli(cli: Cli, cancellation_token: CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let action = match &cli.action {
        Some(a) => a.clone(),
        None => {
            println!("{}", t!("cli.no_action"));
            return Ok(());
        }
    };

    let command = find_command(&action)
        .ok_or_else(|| anyhow!(t!("cli.error.unknown_action"), name = action))?;

    let extension = handlers::commons::load_extension(&cli, cancellation_token)?;
    (command.handler)(extension, cli.args)
}
