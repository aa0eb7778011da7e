//! Messages exchanged with the UI layer.

use serde::{Deserialize, Serialize};

use crate::error::ExplainError;

use super::{ExplanationRequest, ExplanationResult};

/// A message from the UI layer, e.g. `{"action":"explainImage","imageData":"data:image/png;..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyMessage {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

impl BuddyMessage {
    pub fn explain_text(text: impl Into<String>) -> Self {
        Self {
            action: "getExplanation".to_string(),
            text: Some(text.into()),
            image_data: None,
        }
    }

    pub fn explain_image(image_data: impl Into<String>) -> Self {
        Self {
            action: "explainImage".to_string(),
            text: None,
            image_data: Some(image_data.into()),
        }
    }
}

impl TryFrom<BuddyMessage> for ExplanationRequest {
    type Error = ExplainError;

    fn try_from(message: BuddyMessage) -> Result<Self, Self::Error> {
        match message.action.as_str() {
            "getExplanation" | "explainText" => message
                .text
                .map(ExplanationRequest::text)
                .ok_or_else(|| ExplainError::InvalidInput("No text provided".to_string())),
            "explainImage" => message
                .image_data
                .map(ExplanationRequest::image)
                .ok_or_else(|| ExplainError::InvalidInput("No image data provided".to_string())),
            other => Err(ExplainError::InvalidInput(format!(
                "Unknown action: {other}"
            ))),
        }
    }
}

/// Reply sent back to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuddyResponse {
    Explanation(ExplanationResult),
    Error { error: String },
}

impl BuddyResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

impl From<Result<ExplanationResult, ExplainError>> for BuddyResponse {
    fn from(result: Result<ExplanationResult, ExplainError>) -> Self {
        match result {
            Ok(result) => Self::Explanation(result),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::explain::RequestKind;

    #[test]
    fn test_deserialize_image_message() {
        let json = r#"{"action":"explainImage","imageData":"data:image/png;base64,AAAA"}"#;
        let msg: BuddyMessage = serde_json::from_str(json).unwrap();
        let req = ExplanationRequest::try_from(msg).unwrap();
        assert_eq!(req.kind, RequestKind::Image);
        assert_eq!(req.payload, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_text_actions() {
        for action in ["getExplanation", "explainText"] {
            let msg = BuddyMessage {
                action: action.to_string(),
                text: Some("quantum tunnelling".to_string()),
                image_data: None,
            };
            let req = ExplanationRequest::try_from(msg).unwrap();
            assert_eq!(req.kind, RequestKind::Text);
        }
    }

    #[test]
    fn test_missing_payload_is_invalid_input() {
        let msg = BuddyMessage {
            action: "explainImage".to_string(),
            ..Default::default()
        };
        let err = ExplanationRequest::try_from(msg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_unknown_action_is_invalid_input() {
        let msg = BuddyMessage {
            action: "captureVisibleTab".to_string(),
            ..Default::default()
        };
        let err = ExplanationRequest::try_from(msg).unwrap_err();
        assert!(err.to_string().contains("captureVisibleTab"));
    }

    #[test]
    fn test_response_shapes() {
        let ok = BuddyResponse::Explanation(ExplanationResult::local("sorry", None));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["isLocalFallback"], true);

        let err: BuddyResponse = Err(ExplainError::Cancelled).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "Request cancelled");
    }

    #[test]
    fn test_response_deserialize_error_variant() {
        let resp: BuddyResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(resp, BuddyResponse::error("boom"));
    }
}
