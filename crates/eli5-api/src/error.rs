//! Proxy error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eli5_protocols::ProviderError;
use serde_json::json;
use thiserror::Error;

/// Error returned by a proxy handler, rendered as `{ "error": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unusable request payload.
    #[error("{0}")]
    BadRequest(String),

    /// The LLM provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Provider(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}

/// Unparseable or non-JSON request bodies get the same `{ error }` shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.client_message() }))).into_response()
    }
}
