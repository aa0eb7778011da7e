//! Response normalizer.
//!
//! Turns a raw [`UpstreamResponse`] into a validated [`ExplanationPayload`],
//! or a typed [`ExplainError`] naming the first check that rejected it.

use eli5_protocols::{ExplainError, ExplanationPayload, UpstreamResponse};
use serde_json::Value;
use tracing::{debug, warn};

use crate::recovery;

const BOM: char = '\u{feff}';
const HTML_MARKERS: &[&str] = &["<!doctype", "<html"];

/// Validate and parse an upstream response.
pub fn normalize(response: &UpstreamResponse) -> Result<ExplanationPayload, ExplainError> {
    if !response.is_success() {
        return Err(ExplainError::UpstreamError {
            status: response.status_code,
            body: response.raw_body.clone(),
        });
    }

    if let Some(content_type) = response.content_type.as_deref() {
        if !is_json_content_type(content_type) {
            return Err(ExplainError::UnexpectedContentType(content_type.to_string()));
        }
    }

    let body = clean_body(&response.raw_body);
    if body.is_empty() {
        return Err(ExplainError::MalformedBody("empty body".to_string()));
    }
    if looks_like_html(body) {
        return Err(ExplainError::MalformedBody("HTML document".to_string()));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => payload_from_value(&value),
        Err(e) => {
            debug!(error = %e, "Direct parse failed, trying recovery");
            if let Some(value) =
                recovery::recover_with(body, |v| payload_from_value(v).is_ok()).into_data()
            {
                return payload_from_value(&value);
            }
            let value = recovery::recover(body)
                .into_data()
                .ok_or(ExplainError::RecoveryFailed)?;
            payload_from_value(&value)
        }
    }
}

/// Strip a leading byte-order mark and surrounding whitespace.
pub fn clean_body(raw: &str) -> &str {
    raw.trim_start_matches(BOM).trim()
}

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

pub fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    HTML_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Require a non-empty `explanation` string; `extractedText` is optional.
pub fn payload_from_value(value: &Value) -> Result<ExplanationPayload, ExplainError> {
    let explanation = value
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let Some(explanation) = explanation else {
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            warn!(upstream_error = error, "Upstream reported an error in a success response");
        }
        return Err(ExplainError::MissingField("explanation".to_string()));
    };

    let extracted_text = value
        .get("extractedText")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ExplanationPayload {
        explanation: explanation.to_string(),
        extracted_text,
    })
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
