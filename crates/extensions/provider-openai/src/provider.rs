//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use eli5_protocols::error::ProviderError;
use eli5_protocols::provider::{CompletionRequest, CompletionResponse, LLMProvider};

use crate::api::{ApiErrorBody, ApiRequest, ApiResponse};
use crate::converter::{build_request, parse_response};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// OpenAI LLM provider.
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            api_url,
            client,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(REQUEST_TIMEOUT_SECS)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response)
    }
}

async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);

    warn!(status, %message, "OpenAI API returned an error");
    match status {
        401 => ProviderError::AuthenticationFailed(message),
        429 => ProviderError::RateLimited {
            retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        _ => ProviderError::ApiError { status, message },
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        debug!(model = %request.model, json_mode = request.json_mode, "Sending completion request");
        let api_request = build_request(&request);
        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_response(api_response)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
