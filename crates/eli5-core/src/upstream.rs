//! Upstream client.

use std::time::Duration;

use eli5_config::UpstreamConfig;
use eli5_protocols::explain::{validate_image_data_uri, validate_text};
use eli5_protocols::{ExplainError, ExplanationRequest, RequestKind, UpstreamResponse};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::health::join_url;

pub const EXPLAIN_PATH: &str = "/api/explain";
pub const EXTRACT_AND_EXPLAIN_PATH: &str = "/api/extract-and-explain";

/// Performs exactly one POST per call and captures the raw response.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.request_timeout(),
        }
    }

    pub async fn explain_text(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, ExplainError> {
        validate_text(text)?;
        self.post(EXPLAIN_PATH, json!({ "text": text }), cancel).await
    }

    pub async fn explain_image(
        &self,
        image_data_uri: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, ExplainError> {
        validate_image_data_uri(image_data_uri)?;
        self.post(
            EXTRACT_AND_EXPLAIN_PATH,
            json!({ "imageData": image_data_uri }),
            cancel,
        )
        .await
    }

    /// Route a request to the text or image endpoint.
    pub async fn send(
        &self,
        request: &ExplanationRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, ExplainError> {
        match request.kind {
            RequestKind::Text => self.explain_text(&request.payload, cancel).await,
            RequestKind::Image => self.explain_image(&request.payload, cancel).await,
        }
    }

    async fn post(
        &self,
        path: &str,
        body: Value,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, ExplainError> {
        let url = join_url(&self.base_url, path);
        let call = async {
            let response = self.client.post(&url).json(&body).send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let raw_body = response.text().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse::new(status, raw_body, content_type))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExplainError::Cancelled),
            result = tokio::time::timeout(self.timeout, call) => match result {
                Err(_) => {
                    warn!(%url, timeout = ?self.timeout, "Upstream request timed out");
                    Err(ExplainError::UpstreamUnreachable(format!(
                        "request timed out after {:?}",
                        self.timeout
                    )))
                }
                Ok(Err(e)) => {
                    warn!(%url, error = %e, "Upstream request failed");
                    Err(ExplainError::UpstreamUnreachable(e.to_string()))
                }
                Ok(Ok(response)) => {
                    debug!(%url, status = response.status_code, "Upstream responded");
                    Ok(response)
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "upstream_tests.rs"]
mod tests;
