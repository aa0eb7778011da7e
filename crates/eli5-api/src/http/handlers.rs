//! Proxy endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use eli5_core::normalizer::{clean_body, payload_from_value};
use eli5_core::recovery::{extract_json_array, recover_with};
use eli5_protocols::ProviderError;
use eli5_protocols::explain::is_image_data_uri;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::prompts::{
    DEFAULT_FLASHCARDS, Difficulty, MAX_FLASHCARDS, MIN_FLASHCARDS, explain_request,
    flashcards_request, image_request, truncate_chars,
};
use crate::state::AppState;

/// Body of `POST /api/explain`.
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Body of the image endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(default)]
    pub image_data: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageExplainResponse {
    pub explanation: String,
    pub extracted_text: String,
}

/// Body of `POST /api/flashcards`.
#[derive(Debug, Deserialize)]
pub struct FlashcardsRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardsResponse {
    /// Parsed card array, or the raw model reply when it is not an array.
    pub flashcards: Value,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub uptime_secs: u64,
    pub request_count: u64,
    pub provider: String,
    pub started_at: String,
}

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Proxy server is running"
    }))
}

/// POST /api/explain
pub async fn explain_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    state.increment_requests();
    let Json(req) = payload?;

    let text = required_text(req.text.as_deref())?;
    if text.chars().count() < state.explain.min_text_chars {
        return Err(ApiError::BadRequest(
            "Text too short. Please provide more content.".to_string(),
        ));
    }
    let text = truncate_chars(text, state.explain.max_text_chars);
    info!(chars = text.chars().count(), "Explain request");

    let response = state
        .provider
        .complete(explain_request(&state.explain, text))
        .await?;
    let explanation = response.text().trim().to_string();
    if explanation.is_empty() {
        return Err(ProviderError::EmptyResponse.into());
    }

    Ok(Json(ExplainResponse { explanation }))
}

/// POST /api/extract-and-explain, POST /api/explain-image
pub async fn explain_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageExplainResponse>, ApiError> {
    state.increment_requests();
    let Json(req) = payload?;

    let image = req
        .image_data
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No image data provided".to_string()))?;
    if !is_image_data_uri(image) {
        return Err(ApiError::BadRequest("Invalid image data".to_string()));
    }
    info!(bytes = image.len(), "Image explain request");

    let response = state
        .provider
        .complete(image_request(&state.explain, image))
        .await?;

    Ok(Json(parse_image_reply(&response.text())))
}

/// POST /api/flashcards
pub async fn flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardsRequest>, JsonRejection>,
) -> Result<Json<FlashcardsResponse>, ApiError> {
    state.increment_requests();
    let Json(req) = payload?;

    let text = required_text(req.text.as_deref())?;
    let text = truncate_chars(text, state.explain.max_text_chars);
    let count = req
        .count
        .unwrap_or(DEFAULT_FLASHCARDS)
        .clamp(MIN_FLASHCARDS, MAX_FLASHCARDS);
    let difficulty = Difficulty::parse(req.difficulty.as_deref());
    info!(count, ?difficulty, "Flashcards request");

    let response = state
        .provider
        .complete(flashcards_request(&state.explain, text, count, difficulty))
        .await?;

    Ok(Json(FlashcardsResponse {
        flashcards: parse_flashcards(response.text().trim()),
    }))
}

/// GET /api/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime_secs: state.uptime().as_secs(),
        request_count: state.request_count(),
        provider: state.provider.id().to_string(),
        started_at: state.started_at.to_rfc3339(),
    })
}

fn required_text(text: Option<&str>) -> Result<&str, ApiError> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No text provided".to_string()))
}

/// Read `{extractedText, explanation}` out of a vision reply, tolerating
/// garbled JSON. Without a usable explanation the whole reply is used.
pub fn parse_image_reply(content: &str) -> ImageExplainResponse {
    let cleaned = clean_body(content);
    let payload = serde_json::from_str::<Value>(cleaned)
        .ok()
        .and_then(|value| payload_from_value(&value).ok())
        .or_else(|| {
            recover_with(cleaned, |v| payload_from_value(v).is_ok())
                .into_data()
                .and_then(|value| payload_from_value(&value).ok())
        });

    match payload {
        Some(payload) => ImageExplainResponse {
            explanation: payload.explanation,
            extracted_text: payload.extracted_text.unwrap_or_default(),
        },
        None => {
            warn!("Vision reply had no explanation field, returning it verbatim");
            ImageExplainResponse {
                explanation: cleaned.to_string(),
                extracted_text: String::new(),
            }
        }
    }
}

/// The first JSON array in the reply, else the reply as a string.
pub fn parse_flashcards(content: &str) -> Value {
    extract_json_array(content)
        .map(Value::Array)
        .or_else(|| serde_json::from_str::<Value>(content).ok().filter(Value::is_array))
        .unwrap_or_else(|| Value::String(content.to_string()))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
