//! UI message dispatch.

use eli5_protocols::{BuddyMessage, BuddyResponse, ExplanationRequest};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::orchestrator::ExplanationOrchestrator;

/// Route a UI message to the orchestrator and shape the reply.
pub async fn dispatch(
    orchestrator: &ExplanationOrchestrator,
    message: BuddyMessage,
    cancel: &CancellationToken,
) -> BuddyResponse {
    debug!(action = %message.action, "Dispatching message");
    let request = match ExplanationRequest::try_from(message) {
        Ok(request) => request,
        Err(e) => return BuddyResponse::error(e.to_string()),
    };
    orchestrator
        .explain_with_cancel(&request, cancel)
        .await
        .into()
}
