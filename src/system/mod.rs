//! # Command Execution Facade
//!
//! Turns resolved configuration into Helm processes.
//!
//! ## Modules
//!
//! - **`exec_spec`**: `HelmExecSpec`, the mutable description of one invocation that
//!   callers customize before it runs.
//! - **`exec_provider`**: the `exec_helm` operation. Binds the global options and
//!   connection environment onto a spec, lets the caller customize it, runs it and
//!   enforces the exit status.
//! - **`runner`**: the `ProcessRunner` seam between the facade and real processes.
//! - **`executor`**: spawns and waits for processes, with cooperative cancellation.

pub mod exec_provider;
pub mod exec_spec;
pub mod executor;
pub mod runner;
