// src/publishing/oci.rs

use crate::{
    CancellationToken,
    models::{ConnectionOptions, GlobalHelmOptions},
    publishing::{ChartPackage, PublishError, PublishOutcome},
    system::{
        exec_provider::HelmExecProviderSupport,
        runner::{ProcessRunner, SystemRunner},
    },
};

/// Publishes chart archives to an OCI registry with `helm push`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciPublisher {
    registry_url: String,
    options: GlobalHelmOptions,
}

impl OciPublisher {
    pub fn new(registry_url: impl Into<String>, options: GlobalHelmOptions) -> Self {
        Self {
            registry_url: registry_url.into(),
            options,
        }
    }

    /// Runs `helm push <chart> <registry_url>`.
    pub fn publish(
        &self,
        chart: &ChartPackage,
        cancellation_token: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        self.push_with(chart, &SystemRunner, cancellation_token)
    }

    fn push_with(
        &self,
        chart: &ChartPackage,
        runner: &dyn ProcessRunner,
        cancellation_token: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        if !self.registry_url.starts_with("oci://") {
            return Err(PublishError::InvalidRegistry(self.registry_url.clone()));
        }

        let connection = ConnectionOptions::default();
        let support =
            HelmExecProviderSupport::new(&self.options, &connection, runner, cancellation_token);

        support.exec_helm("push", None, |spec| {
            // `push` only exists in Helm 3, which has no `--home`.
            spec.remove_option("--home")
                .arg(chart.path.display().to_string())
                .arg(&self.registry_url);
        })?;

        Ok(PublishOutcome::Published {
            location: format!(
                "{}/{}:{}",
                self.registry_url.trim_end_matches('/'),
                chart.name,
                chart.version
            ),
        })
    }
}
