// src/core/extension.rs

//! `HelmExtension` owns every Helm configuration cell for one build invocation
//! and runs Helm commands with the resolved options.

use crate::{
    CancellationToken,
    constants::{
        DEFAULT_EXECUTABLE, DEFAULT_OUTPUT_SUBDIR, DEFAULT_TIMEOUT_SECONDS, PROP_DEBUG,
        PROP_EXECUTABLE, PROP_EXTRA_ARGS, PROP_HOME, PROP_HOST, PROP_KUBE_CONFIG,
        PROP_KUBE_CONTEXT, PROP_OUTPUT_DIR, PROP_TIMEOUT_SECONDS,
    },
    core::{
        cell::{Cell, PropertyType, ValueKind, ValueSource},
        error::ConfigError,
        project::Project,
    },
    models::{ConnectionOptions, ExecResult, GlobalHelmOptions, ServerOptions},
    system::{
        exec_provider::{HelmError, HelmExecProvider, HelmExecProviderSupport},
        exec_spec::HelmExecSpec,
        runner::{ProcessRunner, SystemRunner},
    },
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// One row of the resolved configuration, for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CellReport {
    pub name: &'static str,
    pub key: Option<&'static str>,
    pub kind: String,
    pub source: String,
    pub value: Option<String>,
}

/// The Helm configuration of a project, plus the `exec_helm` operation.
#[derive(Debug)]
pub struct HelmExtension {
    project: Project,
    executable: Cell<String>,
    debug: Cell<bool>,
    home: Cell<PathBuf>,
    host: Cell<String>,
    kube_context: Cell<String>,
    kube_config: Cell<PathBuf>,
    timeout_seconds: Cell<u32>,
    extra_args: Cell<Vec<String>>,
    output_dir: Cell<PathBuf>,
    runner: Arc<dyn ProcessRunner>,
    cancellation_token: CancellationToken,
}

impl HelmExtension {
    /// Creates the extension with every cell wired to its property and default.
    pub fn new(project: Project) -> Self {
        Self {
            project,
            executable: Cell::new("executable", ValueKind::String)
                .from_property(PROP_EXECUTABLE)
                .interpolated()
                .with_default(|_| DEFAULT_EXECUTABLE.to_string()),
            debug: Cell::new("debug", ValueKind::Bool).from_property(PROP_DEBUG),
            home: Cell::new("home", ValueKind::DirPath)
                .from_property(PROP_HOME)
                .interpolated(),
            host: Cell::new("host", ValueKind::String).from_property(PROP_HOST),
            kube_context: Cell::new("kubeContext", ValueKind::String)
                .from_property(PROP_KUBE_CONTEXT),
            kube_config: Cell::new("kubeConfig", ValueKind::FilePath)
                .from_property(PROP_KUBE_CONFIG)
                .interpolated(),
            timeout_seconds: Cell::new("timeoutSeconds", ValueKind::Int)
                .from_property(PROP_TIMEOUT_SECONDS)
                .with_default(|_| DEFAULT_TIMEOUT_SECONDS),
            extra_args: Cell::new("extraArgs", ValueKind::StringList)
                .from_property(PROP_EXTRA_ARGS)
                .with_default(|_| Vec::new()),
            output_dir: Cell::new("outputDir", ValueKind::DirPath)
                .from_property(PROP_OUTPUT_DIR)
                .interpolated()
                .with_default(|project| project.build_dir().join(DEFAULT_OUTPUT_SUBDIR)),
            runner: Arc::new(SystemRunner),
            cancellation_token: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the process runner.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Shares a cancellation token with every process this extension starts.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The token shared with every process this extension starts.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    // --- Resolved values ---

    pub fn executable(&self) -> Result<String, ConfigError> {
        self.executable.require(&self.project)
    }

    /// Unset means `false`.
    pub fn debug(&self) -> Result<bool, ConfigError> {
        Ok(self.debug.get(&self.project)?.unwrap_or(false))
    }

    pub fn home(&self) -> Result<Option<PathBuf>, ConfigError> {
        self.home.get(&self.project)
    }

    pub fn host(&self) -> Result<Option<String>, ConfigError> {
        self.host.get(&self.project)
    }

    pub fn kube_context(&self) -> Result<Option<String>, ConfigError> {
        self.kube_context.get(&self.project)
    }

    pub fn kube_config(&self) -> Result<Option<PathBuf>, ConfigError> {
        self.kube_config.get(&self.project)
    }

    pub fn timeout_seconds(&self) -> Result<u32, ConfigError> {
        self.timeout_seconds.require(&self.project)
    }

    pub fn extra_args(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.extra_args.get(&self.project)?.unwrap_or_default())
    }

    pub fn output_dir(&self) -> Result<PathBuf, ConfigError> {
        self.output_dir.require(&self.project)
    }

    // --- Explicit values (fail once the cell has been read) ---

    pub fn set_executable(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.executable.set(value.into())
    }

    pub fn set_debug(&mut self, value: bool) -> Result<(), ConfigError> {
        self.debug.set(value)
    }

    pub fn set_home(&mut self, value: impl Into<PathBuf>) -> Result<(), ConfigError> {
        self.home.set(value.into())
    }

    pub fn set_host(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.host.set(value.into())
    }

    pub fn set_kube_context(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.kube_context.set(value.into())
    }

    pub fn set_kube_config(&mut self, value: impl Into<PathBuf>) -> Result<(), ConfigError> {
        self.kube_config.set(value.into())
    }

    pub fn set_timeout_seconds(&mut self, value: u32) -> Result<(), ConfigError> {
        self.timeout_seconds.set(value)
    }

    pub fn set_extra_args<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args
            .set(args.into_iter().map(Into::into).collect())
    }

    pub fn set_output_dir(&mut self, value: impl Into<PathBuf>) -> Result<(), ConfigError> {
        self.output_dir.set(value.into())
    }

    // --- Option groups ---

    /// Options bound onto every invocation.
    pub fn global_options(&self) -> Result<GlobalHelmOptions, ConfigError> {
        Ok(GlobalHelmOptions {
            executable: self.executable()?,
            debug: self.debug()?,
            home: self.home()?,
            extra_args: self.extra_args()?,
        })
    }

    /// Connection settings exported to every invocation's environment.
    pub fn connection_options(&self) -> Result<ConnectionOptions, ConfigError> {
        Ok(ConnectionOptions {
            host: self.host()?,
            kube_config: self.kube_config()?,
        })
    }

    /// Flags for commands that talk to the cluster.
    pub fn server_options(&self) -> Result<ServerOptions, ConfigError> {
        Ok(ServerOptions {
            kube_context: self.kube_context()?,
            timeout_seconds: self.timeout_seconds()?,
        })
    }

    /// Resolves every cell for display. Stops at the first failing cell.
    pub fn report(&self) -> Result<Vec<CellReport>, ConfigError> {
        Ok(vec![
            report(&self.executable, &self.project)?,
            report(&self.debug, &self.project)?,
            report(&self.home, &self.project)?,
            report(&self.host, &self.project)?,
            report(&self.kube_context, &self.project)?,
            report(&self.kube_config, &self.project)?,
            report(&self.timeout_seconds, &self.project)?,
            report(&self.extra_args, &self.project)?,
            report(&self.output_dir, &self.project)?,
        ])
    }
}

fn report<T: PropertyType>(cell: &Cell<T>, project: &Project) -> Result<CellReport, ConfigError> {
    let source: ValueSource = cell.source(project);
    Ok(CellReport {
        name: cell.name(),
        key: cell.key(),
        kind: cell.kind().to_string(),
        source: source.to_string(),
        value: cell.get(project)?.map(|v| v.display_value()),
    })
}

impl HelmExecProvider for HelmExtension {
    fn exec_helm<F>(
        &self,
        command: &str,
        subcommand: Option<&str>,
        customize: F,
    ) -> Result<ExecResult, HelmError>
    where
        F: FnOnce(&mut HelmExecSpec),
    {
        let global = self.global_options()?;
        let connection = self.connection_options()?;
        let support = HelmExecProviderSupport::new(
            &global,
            &connection,
            self.runner.as_ref(),
            &self.cancellation_token,
        );
        Ok(support.exec_helm(command, subcommand, customize)?)
    }
}
