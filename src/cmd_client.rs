//! Client-side command handlers: explain, message and health.

use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use eli5_config::Config;
use eli5_core::{ExplanationOrchestrator, HealthProber, dispatch};
use eli5_protocols::{BuddyMessage, ExplanationRequest, HealthStatus};

/// Handle `explain`: run the orchestrator once and print the result.
pub(crate) async fn handle_explain(
    config: &Config,
    text: Option<String>,
    image: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match (text, image) {
        (_, Some(path)) => ExplanationRequest::image(image_data_uri(path)?),
        (Some(text), None) => ExplanationRequest::text(text),
        (None, None) => ExplanationRequest::text(read_stdin()?),
    };

    let orchestrator = ExplanationOrchestrator::from_config(config);
    let cancel = cancel_on_ctrl_c();
    let result = orchestrator.explain_with_cancel(&request, &cancel).await?;

    if result.is_local_fallback {
        warn!("Explanation service unavailable, showing local fallback");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handle `message`: dispatch a raw extension message and print the reply.
pub(crate) async fn handle_message(
    config: &Config,
    json: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match json {
        Some(json) => json,
        None => read_stdin()?,
    };
    let message: BuddyMessage = serde_json::from_str(&raw)?;

    let orchestrator = ExplanationOrchestrator::from_config(config);
    let cancel = cancel_on_ctrl_c();
    let response = dispatch(&orchestrator, message, &cancel).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Handle `health`: probe the service once and print the status.
pub(crate) async fn handle_health(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let prober = HealthProber::new(&config.upstream);
    let cancel = cancel_on_ctrl_c();
    let status = prober.probe(&cancel).await?;

    info!(url = prober.url(), %status, "Health probe finished");
    println!("{}", status);
    if status != HealthStatus::Healthy {
        return Err(format!("explanation service at {} is {}", prober.url(), status).into());
    }
    Ok(())
}

/// Token that is cancelled when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight request");
            child.cancel();
        }
    });
    token
}

fn read_stdin() -> Result<String, Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Media type for an image file, by extension.
fn image_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Encode an image file as a `data:image/<type>;base64,` URI.
pub(crate) fn image_data_uri(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let media_type = image_media_type(path)
        .ok_or_else(|| format!("Unsupported image type: {}", path.display()))?;
    let bytes = std::fs::read(path)?;
    Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)))
}
