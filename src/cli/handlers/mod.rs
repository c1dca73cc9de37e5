// src/cli/handlers/mod.rs

// One module per action. Every handler has the signature
// `fn(HelmExtension, Vec<String>) -> anyhow::Result<()>`.

pub mod commons;
pub mod config;
pub mod exec;
pub mod publish;
