//! Tracing setup and proxy server startup for ELI5 Buddy.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use eli5_api::{AppState, ProxyServer};
use eli5_config::Config;
use eli5_provider_openai::OpenAIProvider;

const PROVIDER_ID: &str = "openai";

/// Get the ELI5 Buddy home directory (~/.eli5-buddy).
pub(crate) fn eli5_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".eli5-buddy"))
        .unwrap_or_else(|| PathBuf::from(".eli5-buddy"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.eli5-buddy/logs/ with daily rotation. Console
/// output goes to stderr so command output on stdout stays machine-readable.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = eli5_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("eli5-buddy")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Resolve the OpenAI key: the config value first, then `OPENAI_API_KEY`.
fn resolve_api_key(config: &Config) -> Option<String> {
    config
        .provider(PROVIDER_ID)
        .and_then(|p| p.api_key())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(format!("{}_API_KEY", PROVIDER_ID.to_uppercase()))
                .ok()
                .filter(|key| !key.trim().is_empty())
        })
}

fn build_provider(config: &Config) -> Result<OpenAIProvider, Box<dyn std::error::Error>> {
    let Some(api_key) = resolve_api_key(config) else {
        error!("No OpenAI API key configured");
        return Err("OPENAI_API_KEY is not set and [providers.openai] has no api_key".into());
    };

    let base_url = config.provider(PROVIDER_ID).and_then(|p| p.base_url.clone());
    let provider = match base_url {
        Some(url) => {
            info!("Using OpenAI-compatible endpoint: {}", url);
            OpenAIProvider::with_url(api_key, url)
        }
        None => OpenAIProvider::new(api_key),
    };
    Ok(provider)
}

/// Run the proxy server in foreground until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting ELI5 Buddy proxy v{}", env!("CARGO_PKG_VERSION"));

    let provider = build_provider(&config)?;
    info!("Registered provider: {} ({})", PROVIDER_ID, provider.api_url());

    let state = Arc::new(AppState::new(Arc::new(provider), config.explain.clone()));
    let server = ProxyServer::new(config.server.clone(), state);
    server.run(shutdown_signal()).await?;

    info!("ELI5 Buddy proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
