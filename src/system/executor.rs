// src/system/executor.rs

use crate::{CancellationToken, models::ExecResult, system::runner::Invocation};
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with a non-zero exit code ({}).", describe_exit(.code))]
    NonZeroExitStatus { command: String, code: Option<i32> },
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_string(), |c| c.to_string())
}

fn is_cancelled(cancellation_token: &CancellationToken) -> bool {
    cancellation_token.load(Ordering::Relaxed)
}

/// Runs an invocation to completion and returns its exit status.
///
/// Without output capture, stdio is inherited and the child is polled so that a
/// raised `CancellationToken` can kill it. With capture, the call blocks on the
/// child and only checks for cancellation before starting.
pub fn execute(
    invocation: &Invocation,
    cancellation_token: &CancellationToken,
) -> Result<ExecResult, ExecutionError> {
    if invocation.program.trim().is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    if is_cancelled(cancellation_token) {
        return Err(ExecutionError::Cancelled);
    }

    let command_line = invocation.command_line();
    log::debug!("Executing: {}", command_line);

    let mut command = StdCommand::new(&invocation.program);
    command.args(&invocation.args).envs(&invocation.env);
    if let Some(dir) = &invocation.working_dir {
        command.current_dir(dunce::simplified(dir));
    }

    if invocation.capture_output {
        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            ExecutionError::InvalidUtf8Output {
                command: command_line,
                source: e,
            }
        })?;
        return Ok(ExecResult {
            exit_code: output.status.code(),
            stdout: Some(stdout),
        });
    }

    let mut child = command
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    // Non-blocking wait loop to allow for cancellation.
    let status: ExitStatus = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if is_cancelled(cancellation_token) {
                    log::debug!(
                        "Cancellation requested, killing child process (PID: {})...",
                        child.id()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill child process {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    return Err(ExecutionError::Cancelled);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
        }
    };

    log::debug!("'{}' finished with {}", command_line, status);
    Ok(ExecResult {
        exit_code: status.code(),
        stdout: None,
    })
}
