// src/system/exec_spec.rs

use crate::{
    constants::{ENV_HELM_HOST, ENV_KUBECONFIG},
    models::{ConnectionOptions, GlobalHelmOptions, ServerOptions},
    system::runner::Invocation,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Describes one Helm invocation while it is being assembled.
///
/// The facade binds the global options first and then hands the spec to the
/// caller, so anything the caller sets replaces what was bound: options with the
/// same name, environment variables with the same key, and the executable.
#[derive(Debug, Clone)]
pub struct HelmExecSpec {
    executable: String,
    command: String,
    subcommand: Option<String>,
    options: Vec<(String, Option<String>)>,
    args: Vec<String>,
    global_extra_args: Vec<String>,
    extra_args: Vec<String>,
    env: BTreeMap<String, String>,
    working_dir: Option<PathBuf>,
    ignore_exit_value: bool,
    capture_output: bool,
}

impl HelmExecSpec {
    pub fn new(
        executable: impl Into<String>,
        command: impl Into<String>,
        subcommand: Option<&str>,
    ) -> Self {
        Self {
            executable: executable.into(),
            command: command.into(),
            subcommand: subcommand.map(str::to_string),
            options: Vec::new(),
            args: Vec::new(),
            global_extra_args: Vec::new(),
            extra_args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: None,
            ignore_exit_value: false,
            capture_output: false,
        }
    }

    // --- Binding (used by the facade before the caller runs) ---

    /// Binds `--debug`, `--home` and the global extra arguments.
    pub(crate) fn bind_global_options(&mut self, options: &GlobalHelmOptions) {
        self.executable = options.executable.clone();
        if options.debug {
            self.flag("--debug");
        }
        if let Some(home) = &options.home {
            self.option("--home", home.display().to_string());
        }
        self.global_extra_args = options.extra_args.clone();
    }

    /// Exports `HELM_HOST` and `KUBECONFIG` for the configured connection.
    pub(crate) fn bind_connection(&mut self, connection: &ConnectionOptions) {
        if let Some(host) = &connection.host {
            self.env(ENV_HELM_HOST, host);
        }
        if let Some(kube_config) = &connection.kube_config {
            self.env(ENV_KUBECONFIG, kube_config.display().to_string());
        }
    }

    // --- Caller customization ---

    /// Replaces the executable.
    pub fn executable(&mut self, executable: impl Into<String>) -> &mut Self {
        self.executable = executable.into();
        self
    }

    /// Sets `name` to `value`, replacing an earlier value for the same option.
    pub fn option(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.put_option(name.into(), Some(value.into()));
        self
    }

    /// Sets `name` only if `value` is present.
    pub fn option_if_some<V: Into<String>>(
        &mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.option(name, value);
        }
        self
    }

    /// Adds a valueless flag such as `--dry-run`.
    pub fn flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.put_option(name.into(), None);
        self
    }

    /// Removes an option or flag, including one bound from the global options.
    pub fn remove_option(&mut self, name: &str) -> &mut Self {
        self.options.retain(|(existing, _)| existing != name);
        self
    }

    /// Appends a positional argument.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Appends positional arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends free-form arguments after the global extra arguments.
    pub fn extra_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the process.
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn working_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Treats a non-zero exit as a normal result instead of an error.
    pub fn ignore_exit_value(&mut self) -> &mut Self {
        self.ignore_exit_value = true;
        self
    }

    /// Captures standard output into the result.
    pub fn capture_output(&mut self) -> &mut Self {
        self.capture_output = true;
        self
    }

    /// Adds `--kube-context` and `--timeout` for commands that talk to the cluster.
    pub fn server_options(&mut self, server: &ServerOptions) -> &mut Self {
        self.option_if_some("--kube-context", server.kube_context.clone());
        self.option("--timeout", server.timeout_seconds.to_string())
    }

    // --- Inspection ---

    pub fn get_executable(&self) -> &str {
        &self.executable
    }

    /// The value of an option, `Some(None)` for a flag, `None` when absent.
    pub fn get_option(&self, name: &str) -> Option<Option<&str>> {
        self.options
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Every argument after the executable, in the order it will be passed.
    ///
    /// `command [subcommand] <options> <args> <global extra args> <extra args>`
    pub fn command_line(&self) -> Vec<String> {
        let mut line = vec![self.command.clone()];
        line.extend(self.subcommand.iter().cloned());
        for (name, value) in &self.options {
            line.push(name.clone());
            line.extend(value.iter().cloned());
        }
        line.extend(self.args.iter().cloned());
        line.extend(self.global_extra_args.iter().cloned());
        line.extend(self.extra_args.iter().cloned());
        line
    }

    /// Freezes the spec into a runnable [`Invocation`].
    pub fn to_invocation(&self) -> Invocation {
        Invocation {
            program: self.executable.clone(),
            args: self.command_line(),
            env: self.env.clone(),
            working_dir: self.working_dir.clone(),
            capture_output: self.capture_output,
            ignore_exit_value: self.ignore_exit_value,
        }
    }

    fn put_option(&mut self, name: String, value: Option<String>) {
        match self.options.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.options.push((name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_spec(options: &GlobalHelmOptions) -> HelmExecSpec {
        let mut spec = HelmExecSpec::new("ignored", "install", None);
        spec.bind_global_options(options);
        spec
    }

    #[test]
    fn test_command_line_order() {
        let options = GlobalHelmOptions {
            executable: "/usr/local/bin/helm".to_string(),
            debug: true,
            home: Some(PathBuf::from("/opt/helm-home")),
            extra_args: vec!["--tls".to_string()],
        };
        let mut spec = HelmExecSpec::new("helm", "repo", Some("add"));
        spec.bind_global_options(&options);
        spec.args(["stable", "https://charts.example.com"])
            .extra_args(["--no-update"]);

        assert_eq!(spec.get_executable(), "/usr/local/bin/helm");
        assert_eq!(
            spec.command_line(),
            vec![
                "repo",
                "add",
                "--debug",
                "--home",
                "/opt/helm-home",
                "stable",
                "https://charts.example.com",
                "--tls",
                "--no-update",
            ]
        );
    }

    #[test]
    fn test_caller_option_replaces_bound_option() {
        let options = GlobalHelmOptions {
            home: Some(PathBuf::from("/global/home")),
            ..Default::default()
        };
        let mut spec = bound_spec(&options);
        spec.option("--home", "/caller/home");
        assert_eq!(spec.get_option("--home"), Some(Some("/caller/home")));
        assert_eq!(
            spec.command_line()
                .iter()
                .filter(|arg| arg.as_str() == "--home")
                .count(),
            1
        );
    }

    #[test]
    fn test_caller_can_remove_bound_flag() {
        let options = GlobalHelmOptions {
            debug: true,
            ..Default::default()
        };
        let mut spec = bound_spec(&options);
        assert_eq!(spec.get_option("--debug"), Some(None));
        spec.remove_option("--debug");
        assert_eq!(spec.get_option("--debug"), None);
    }

    #[test]
    fn test_connection_env_and_caller_override() {
        let connection = ConnectionOptions {
            host: Some("example:44134".to_string()),
            kube_config: Some(PathBuf::from("/home/user/.kube/config")),
        };
        let mut spec = bound_spec(&GlobalHelmOptions::default());
        spec.bind_connection(&connection);
        assert_eq!(spec.get_env(ENV_HELM_HOST), Some("example:44134"));
        assert_eq!(spec.get_env(ENV_KUBECONFIG), Some("/home/user/.kube/config"));

        spec.env(ENV_HELM_HOST, "other:44134");
        assert_eq!(spec.get_env(ENV_HELM_HOST), Some("other:44134"));
    }

    #[test]
    fn test_empty_connection_sets_no_env() {
        let mut spec = bound_spec(&GlobalHelmOptions::default());
        spec.bind_connection(&ConnectionOptions::default());
        assert!(spec.to_invocation().env.is_empty());
    }

    #[test]
    fn test_server_options() {
        let mut spec = bound_spec(&GlobalHelmOptions::default());
        spec.server_options(&ServerOptions {
            kube_context: Some("staging".to_string()),
            timeout_seconds: 300,
        });
        assert_eq!(spec.get_option("--kube-context"), Some(Some("staging")));
        assert_eq!(spec.get_option("--timeout"), Some(Some("300")));

        let mut without_context = bound_spec(&GlobalHelmOptions::default());
        without_context.server_options(&ServerOptions {
            kube_context: None,
            timeout_seconds: 60,
        });
        assert_eq!(without_context.get_option("--kube-context"), None);
    }

    #[test]
    fn test_to_invocation_carries_flags() {
        let mut spec = bound_spec(&GlobalHelmOptions::default());
        spec.ignore_exit_value().capture_output().working_dir("/tmp");
        let invocation = spec.to_invocation();
        assert_eq!(invocation.program, "helm");
        assert!(invocation.ignore_exit_value);
        assert!(invocation.capture_output);
        assert_eq!(invocation.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(invocation.args, vec!["install"]);
    }
}
