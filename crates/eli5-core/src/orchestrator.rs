//! Explanation orchestrator.
//!
//! Sequences probe, call and normalization for one request. Every failure
//! except invalid input and cancellation ends in the local fallback.

use eli5_config::{Config, FallbackConfig, UpstreamConfig};
use eli5_protocols::{
    ExplainError, ExplanationPayload, ExplanationRequest, ExplanationResult, HealthStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fallback::LocalFallback;
use crate::health::HealthProber;
use crate::normalizer::normalize;
use crate::upstream::UpstreamClient;

/// Top-level entry point for the UI layer.
///
/// Holds no per-request state; concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct ExplanationOrchestrator {
    prober: HealthProber,
    client: UpstreamClient,
    fallback: LocalFallback,
}

impl ExplanationOrchestrator {
    pub fn new(upstream: &UpstreamConfig, fallback: &FallbackConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            prober: HealthProber::with_client(http.clone(), upstream),
            client: UpstreamClient::with_client(http, upstream),
            fallback: LocalFallback::new(fallback),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upstream, &config.fallback)
    }

    /// Explain with a token that is never cancelled.
    pub async fn explain(
        &self,
        request: &ExplanationRequest,
    ) -> Result<ExplanationResult, ExplainError> {
        self.explain_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Explain once. Only [`ExplainError::InvalidInput`] and
    /// [`ExplainError::Cancelled`] are returned as errors.
    pub async fn explain_with_cancel(
        &self,
        request: &ExplanationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExplanationResult, ExplainError> {
        request.validate()?;

        match self.run(request, cancel).await {
            Ok(payload) => {
                info!(kind = ?request.kind, "Explanation served by upstream");
                Ok(payload.into())
            }
            Err(e) if e.falls_back() => {
                warn!(kind = ?request.kind, error_kind = ?e.kind(), error = %e, "Using local fallback");
                Ok(self.fallback.for_request(request))
            }
            Err(e) => {
                debug!(error = %e, "Explanation aborted");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &ExplanationRequest,
        cancel: &CancellationToken,
    ) -> Result<ExplanationPayload, ExplainError> {
        let health = self.prober.probe(cancel).await?;
        if health != HealthStatus::Healthy {
            return Err(ExplainError::UpstreamUnreachable(format!(
                "health probe reported {health}"
            )));
        }

        let response = self.client.send(request, cancel).await?;
        debug!(status = response.status_code, "Normalizing upstream response");
        normalize(&response)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
