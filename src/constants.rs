// src/constants.rs

//! Property keys, defaults and well-known names shared across the crate.

/// Name of the project-level configuration file (in the project root).
pub const PROJECT_CONFIG_FILENAME: &str = "helmw.toml";

/// Build directory used when none is given, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Top-level table of the config file that declares publishing repositories.
/// It is not flattened into the property store.
pub const REPOSITORIES_TABLE: &str = "repositories";

// --- Property keys ---

/// Path or name of the Helm executable.
pub const PROP_EXECUTABLE: &str = "helm.executable";
/// Enables `--debug` on every invocation.
pub const PROP_DEBUG: &str = "helm.debug";
/// Helm home directory, passed as `--home`.
pub const PROP_HOME: &str = "helm.home";
/// Tiller address, exported as `HELM_HOST`.
pub const PROP_HOST: &str = "helm.host";
/// kubeconfig context, passed as `--kube-context`.
pub const PROP_KUBE_CONTEXT: &str = "helm.kubeContext";
/// kubeconfig file, exported as `KUBECONFIG`.
pub const PROP_KUBE_CONFIG: &str = "helm.kubeConfig";
/// Timeout for Kubernetes operations, passed as `--timeout`.
pub const PROP_TIMEOUT_SECONDS: &str = "helm.timeoutSeconds";
/// Extra arguments appended to every invocation.
pub const PROP_EXTRA_ARGS: &str = "helm.extraArgs";
/// Base output directory for packaged charts.
pub const PROP_OUTPUT_DIR: &str = "helm.outputDir";

// --- Defaults ---

/// Executable used when `helm.executable` is not set.
pub const DEFAULT_EXECUTABLE: &str = "helm";

/// Timeout used when `helm.timeoutSeconds` is not set.
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 300;

/// Output directory used when `helm.outputDir` is not set, relative to the build dir.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "helm/charts";

// --- Subprocess environment ---

/// Environment variable carrying the Tiller address.
pub const ENV_HELM_HOST: &str = "HELM_HOST";

/// Environment variable carrying the kubeconfig path.
pub const ENV_KUBECONFIG: &str = "KUBECONFIG";

/// File extension of packaged chart archives.
pub const CHART_ARCHIVE_EXTENSION: &str = "tgz";
