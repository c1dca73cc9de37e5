// src/cli/handlers/config.rs

use crate::{
    core::extension::{CellReport, HelmExtension},
    publishing::repository::repository_names,
};
use anyhow::Result;
use clap::Parser;
use colored::*;
use serde::Serialize;
use std::path::Path;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the resolved Helm configuration of the project."
)]
struct ConfigArgs {
    /// Print machine-readable JSON instead of a table.
    #[arg(long)]
    json: bool,
}

/// Everything `config --json` prints.
#[derive(Serialize, Debug)]
struct ConfigView<'a> {
    root: &'a Path,
    build_dir: &'a Path,
    config_file: Option<&'a Path>,
    properties: Vec<CellReport>,
    repositories: Vec<String>,
}

impl<'a> ConfigView<'a> {
    fn collect(extension: &'a HelmExtension) -> Result<Self> {
        let project = extension.project();
        let mut repositories = repository_names(extension);
        repositories.sort();
        Ok(Self {
            root: project.root(),
            build_dir: project.build_dir(),
            config_file: project.config_file(),
            properties: extension.report()?,
            repositories,
        })
    }
}

/// The main handler for the `config` action.
pub fn handle(extension: HelmExtension, args: Vec<String>) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;
    let view = ConfigView::collect(&extension)?;

    if config_args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_project(&view);
    print_properties(&view.properties);
    print_repositories(&view.repositories);
    println!();
    Ok(())
}

fn print_project(view: &ConfigView<'_>) {
    println!("\n--- {} ---", t!("config.header").yellow());
    println!(
        "  {:<15} {}",
        t!("config.label.root").blue(),
        view.root.display()
    );
    println!(
        "  {:<15} {}",
        t!("config.label.build_dir").blue(),
        view.build_dir.display()
    );
    let config_file = view
        .config_file
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| t!("config.label.none").to_string());
    println!("  {:<15} {}", t!("config.label.config_file").blue(), config_file);
}

fn print_properties(properties: &[CellReport]) {
    println!("\n  {}:", t!("config.label.properties").blue());
    for row in properties {
        let value = match &row.value {
            Some(v) => v.as_str().normal(),
            None => t!("config.label.unset").dimmed(),
        };
        println!(
            "    {:<16} {:<22} {} {}",
            row.name.cyan(),
            row.key.unwrap_or("-").dimmed(),
            value,
            format!("({})", row.source).dimmed()
        );
    }
}

fn print_repositories(repositories: &[String]) {
    if repositories.is_empty() {
        return;
    }
    println!("\n  {}:", t!("config.label.repositories").blue());
    for name in repositories {
        println!("    - {}", name.cyan());
    }
}
