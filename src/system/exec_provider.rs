// src/system/exec_provider.rs

use crate::{
    CancellationToken,
    core::error::ConfigError,
    models::{ConnectionOptions, ExecResult, GlobalHelmOptions},
    system::{
        exec_spec::HelmExecSpec,
        executor::ExecutionError,
        runner::ProcessRunner,
    },
};
use thiserror::Error;

/// Errors from a Helm invocation: either resolving its configuration or running it.
#[derive(Error, Debug)]
pub enum HelmError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl HelmError {
    /// Whether the invocation was stopped through the cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Execution(ExecutionError::Cancelled))
    }
}

/// Anything that can run Helm commands with its configured global options.
pub trait HelmExecProvider {
    /// Runs `helm <command> [subcommand]`, letting `customize` adjust the invocation
    /// after the global options have been bound.
    ///
    /// A non-zero exit is an error unless `customize` called
    /// [`HelmExecSpec::ignore_exit_value`].
    fn exec_helm<F>(
        &self,
        command: &str,
        subcommand: Option<&str>,
        customize: F,
    ) -> Result<ExecResult, HelmError>
    where
        F: FnOnce(&mut HelmExecSpec);
}

/// Shared implementation of [`HelmExecProvider::exec_helm`] over resolved options.
#[derive(Debug)]
pub struct HelmExecProviderSupport<'a> {
    global: &'a GlobalHelmOptions,
    connection: &'a ConnectionOptions,
    runner: &'a dyn ProcessRunner,
    cancellation_token: &'a CancellationToken,
}

impl<'a> HelmExecProviderSupport<'a> {
    pub fn new(
        global: &'a GlobalHelmOptions,
        connection: &'a ConnectionOptions,
        runner: &'a dyn ProcessRunner,
        cancellation_token: &'a CancellationToken,
    ) -> Self {
        Self {
            global,
            connection,
            runner,
            cancellation_token,
        }
    }

    /// Binds, customizes, runs and checks one invocation.
    pub fn exec_helm<F>(
        &self,
        command: &str,
        subcommand: Option<&str>,
        customize: F,
    ) -> Result<ExecResult, ExecutionError>
    where
        F: FnOnce(&mut HelmExecSpec),
    {
        let mut spec = HelmExecSpec::new(&self.global.executable, command, subcommand);
        spec.bind_global_options(self.global);
        spec.bind_connection(self.connection);
        customize(&mut spec);

        let invocation = spec.to_invocation();
        log::debug!("Helm invocation: {}", invocation);

        let result = self.runner.run(&invocation, self.cancellation_token)?;
        if !result.is_success() && !invocation.ignore_exit_value {
            return Err(ExecutionError::NonZeroExitStatus {
                command: invocation.command_line(),
                code: result.exit_code,
            });
        }
        if !result.is_success() {
            log::debug!(
                "Ignoring exit code {:?} of '{}'.",
                result.exit_code,
                invocation
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::system::runner::Invocation;
    use std::sync::Mutex;

    /// Records invocations and answers with a fixed exit code.
    #[derive(Debug)]
    pub(crate) struct RecordingRunner {
        pub(crate) exit_code: i32,
        pub(crate) invocations: Mutex<Vec<Invocation>>,
    }

    impl RecordingRunner {
        pub(crate) fn exiting_with(exit_code: i32) -> Self {
            Self {
                exit_code,
                invocations: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn last(&self) -> Invocation {
            self.invocations
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no invocation was recorded")
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(
            &self,
            invocation: &Invocation,
            _cancellation_token: &CancellationToken,
        ) -> Result<ExecResult, ExecutionError> {
            self.invocations.lock().unwrap().push(invocation.clone());
            Ok(ExecResult {
                exit_code: Some(self.exit_code),
                stdout: invocation.capture_output.then(String::new),
            })
        }
    }
}
