//! # helmwright
//!
//! Bridges layered build configuration to invocations of the `helm` CLI and
//! publishes packaged charts through serializable publisher strategies.
//!
//! - **`core`**: typed, lazily-resolved configuration cells and the
//!   `HelmExtension` that owns them.
//! - **`system`**: the command execution facade and the process executor.
//! - **`publishing`**: publisher parameters and the publishers they create.
//! - **`cli`**: argument parsing and action handlers for the `helmw` binary.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag that asks running processes to stop.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod publishing;
pub mod system;
