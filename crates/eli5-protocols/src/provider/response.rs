//! Completion response types.

use serde::{Deserialize, Serialize};

use crate::types::{Message, StopReason, Usage};

/// Response from a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unique ID for this completion.
    pub id: String,

    /// Model used.
    pub model: String,

    /// The assistant's response message.
    pub message: Message,

    /// Reason for stopping.
    pub stop_reason: StopReason,

    /// Token usage.
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    /// Text of the assistant message.
    pub fn text(&self) -> String {
        self.message.content.text()
    }
}
