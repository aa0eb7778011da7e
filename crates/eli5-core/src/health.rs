//! Health prober.

use std::time::Duration;

use eli5_config::UpstreamConfig;
use eli5_protocols::{ExplainError, HealthStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Issues a single GET against the upstream health endpoint.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HealthProber {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            url: join_url(&config.base_url, &config.health_path),
            timeout: config.health_timeout(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe once, without retries.
    ///
    /// A timeout or transport failure is [`HealthStatus::Unreachable`]; the
    /// only error is [`ExplainError::Cancelled`].
    pub async fn probe(&self, cancel: &CancellationToken) -> Result<HealthStatus, ExplainError> {
        let request = self.client.get(&self.url).send();

        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExplainError::Cancelled),
            result = tokio::time::timeout(self.timeout, request) => match result {
                Err(_) => {
                    warn!(url = %self.url, timeout = ?self.timeout, "Health probe timed out");
                    HealthStatus::Unreachable
                }
                Ok(Err(e)) => {
                    warn!(url = %self.url, error = %e, "Health probe failed");
                    HealthStatus::Unreachable
                }
                Ok(Ok(response)) if response.status().is_success() => HealthStatus::Healthy,
                Ok(Ok(response)) => {
                    warn!(url = %self.url, status = %response.status(), "Health probe returned non-success");
                    HealthStatus::Unhealthy
                }
            },
        };

        debug!(url = %self.url, %status, "Health probe complete");
        Ok(status)
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
