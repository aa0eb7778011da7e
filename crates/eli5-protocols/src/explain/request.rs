//! Explanation requests coming from the UI layer.

use serde::{Deserialize, Serialize};

use crate::error::ExplainError;

/// Prefix every image payload must carry.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// What the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Text,
    Image,
}

/// A request to explain selected content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub kind: RequestKind,
    /// Raw text, or an image data URI.
    pub payload: String,
}

impl ExplanationRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Text,
            payload: text.into(),
        }
    }

    pub fn image(data_uri: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Image,
            payload: data_uri.into(),
        }
    }

    /// Check the payload invariants without touching the network.
    pub fn validate(&self) -> Result<(), ExplainError> {
        match self.kind {
            RequestKind::Text => validate_text(&self.payload),
            RequestKind::Image => validate_image_data_uri(&self.payload),
        }
    }
}

/// Any non-empty text is explainable, including whitespace-only selections.
pub fn validate_text(text: &str) -> Result<(), ExplainError> {
    if text.is_empty() {
        return Err(ExplainError::InvalidInput("text must not be empty".to_string()));
    }
    Ok(())
}

pub fn validate_image_data_uri(data_uri: &str) -> Result<(), ExplainError> {
    if data_uri.trim().is_empty() {
        return Err(ExplainError::InvalidInput(
            "image data must not be empty".to_string(),
        ));
    }
    if !is_image_data_uri(data_uri) {
        return Err(ExplainError::InvalidInput(format!(
            "image data must be a {IMAGE_DATA_URI_PREFIX}<type> data URI"
        )));
    }
    Ok(())
}

/// `data:image/<subtype>[;params],<data>` with a non-empty subtype and data.
pub fn is_image_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix(IMAGE_DATA_URI_PREFIX) else {
        return false;
    };
    let Some((meta, data)) = rest.split_once(',') else {
        return false;
    };
    let subtype = meta.split(';').next().unwrap_or_default();
    !subtype.is_empty() && !data.trim().is_empty()
}
