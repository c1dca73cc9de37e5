// src/models.rs

//! Plain data shared between the configuration layer, the execution facade
//! and the publishers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- OPTION GROUPS ---
// Resolved snapshots of the extension's cells. They hold no handles, so they can
// be serialized into publisher parameters and sent to worker threads.

/// Options bound onto every Helm invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalHelmOptions {
    pub executable: String,
    pub debug: bool,
    pub home: Option<PathBuf>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for GlobalHelmOptions {
    fn default() -> Self {
        Self {
            executable: crate::constants::DEFAULT_EXECUTABLE.to_string(),
            debug: false,
            home: None,
            extra_args: Vec::new(),
        }
    }
}

/// Cluster connection settings exported to the subprocess environment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Tiller address (`host:port`), exported as `HELM_HOST`.
    pub host: Option<String>,
    /// kubeconfig path, exported as `KUBECONFIG`.
    pub kube_config: Option<PathBuf>,
}

/// Flags for commands that talk to the cluster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub kube_context: Option<String>,
    pub timeout_seconds: u32,
}

// --- EXECUTION RESULT ---

/// Outcome of a finished Helm process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output, if capturing was requested.
    pub stdout: Option<String>,
}

impl ExecResult {
    /// Whether the process exited with code zero.
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
