//! Explanation pipeline errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised anywhere in the explanation pipeline.
///
/// Every variant except [`ExplainError::InvalidInput`] and
/// [`ExplainError::Cancelled`] is absorbed by the orchestrator and turned into
/// a local fallback result.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream error: HTTP {status}")]
    UpstreamError { status: u16, body: String },

    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    #[error("Malformed body: {0}")]
    MalformedBody(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("All recovery strategies failed")]
    RecoveryFailed,

    #[error("Request cancelled")]
    Cancelled,
}

/// Discriminant of [`ExplainError`], for branching without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    UpstreamUnreachable,
    UpstreamError,
    UnexpectedContentType,
    MalformedBody,
    MissingField,
    RecoveryFailed,
    Cancelled,
}

impl ExplainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::UpstreamUnreachable(_) => ErrorKind::UpstreamUnreachable,
            Self::UpstreamError { .. } => ErrorKind::UpstreamError,
            Self::UnexpectedContentType(_) => ErrorKind::UnexpectedContentType,
            Self::MalformedBody(_) => ErrorKind::MalformedBody,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::RecoveryFailed => ErrorKind::RecoveryFailed,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the orchestrator should answer this failure with a local fallback.
    pub fn falls_back(&self) -> bool {
        !matches!(self, Self::InvalidInput(_) | Self::Cancelled)
    }
}
