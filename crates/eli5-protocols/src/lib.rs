//! # ELI5 Buddy Protocols
//!
//! Shared definitions for the ELI5 Buddy workspace. Contains only data types
//! and traits - no I/O.
//!
//! - [`explain`] - the explanation data model exchanged between the UI
//!   boundary, the orchestrator and the proxy
//! - [`error`] - the explanation failure taxonomy and provider errors
//! - [`provider`] - the [`LLMProvider`] trait the proxy forwards to
//! - [`types`] - conversation messages used by providers

pub mod error;
pub mod explain;
pub mod provider;
pub mod types;

pub use error::{ErrorKind, ExplainError, ProviderError};
pub use explain::{
    BuddyMessage, BuddyResponse, ExplanationPayload, ExplanationRequest, ExplanationResult,
    HealthStatus, RecoveryOutcome, RecoveryStrategy, RequestKind, UpstreamResponse,
};
pub use provider::{CompletionRequest, CompletionResponse, LLMProvider};
pub use types::*;
