//! Explanation results returned to the UI layer.

use serde::{Deserialize, Serialize};

/// Validated content extracted from an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationPayload {
    pub explanation: String,
    pub extracted_text: Option<String>,
}

/// The normalized answer handed back to the caller.
///
/// `explanation` is never empty. `is_local_fallback` is set whenever the
/// content was produced locally rather than by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationResult {
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub is_local_fallback: bool,
}

impl ExplanationResult {
    pub fn local(explanation: impl Into<String>, extracted_text: Option<String>) -> Self {
        Self {
            explanation: explanation.into(),
            extracted_text,
            is_local_fallback: true,
        }
    }
}

impl From<ExplanationPayload> for ExplanationResult {
    fn from(payload: ExplanationPayload) -> Self {
        Self {
            explanation: payload.explanation,
            extracted_text: payload.extracted_text,
            is_local_fallback: false,
        }
    }
}
