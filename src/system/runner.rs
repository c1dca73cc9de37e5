// src/system/runner.rs

use crate::{
    CancellationToken,
    models::ExecResult,
    system::executor::{self, ExecutionError},
};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A fully bound process invocation, ready to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub capture_output: bool,
    pub ignore_exit_value: bool,
}

impl Invocation {
    /// The command line as a single shell-quoted string, for messages and logs.
    pub fn command_line(&self) -> String {
        let words =
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            let mut line = self.program.clone();
            for arg in &self.args {
                line.push(' ');
                line.push_str(arg);
            }
            line
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Runs an [`Invocation`] and reports how it ended.
///
/// Implementations must not judge the exit status; the facade does that.
pub trait ProcessRunner: Send + Sync + fmt::Debug {
    fn run(
        &self,
        invocation: &Invocation,
        cancellation_token: &CancellationToken,
    ) -> Result<ExecResult, ExecutionError>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        invocation: &Invocation,
        cancellation_token: &CancellationToken,
    ) -> Result<ExecResult, ExecutionError> {
        executor::execute(invocation, cancellation_token)
    }
}
