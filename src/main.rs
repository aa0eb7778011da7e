//! ELI5 Buddy - explain anything like I'm five.
//!
//! Runs the explanation proxy (`serve`) or drives the fault-tolerant
//! explanation pipeline from the command line (`explain`, `message`, `health`).

mod cli;
mod cmd_client;
mod server;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use eli5_config::{Config, ConfigLoader, ConfigValidator};

use cli::{Cli, Commands};
use cmd_client::{handle_explain, handle_health, handle_message};
use server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let config_path = PathBuf::from(ConfigLoader::expand_path(&cli.config.to_string_lossy()));
    let mut config = ConfigLoader::load_or_default(&config_path)?;
    info!("Loaded configuration from {}", config_path.display());

    match cli.command {
        None => {
            validate(&config)?;
            run_server(config).await
        }
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            validate(&config)?;
            run_server(config).await
        }
        Some(Commands::Explain {
            text,
            image,
            base_url,
        }) => {
            override_base_url(&mut config, base_url);
            validate(&config)?;
            handle_explain(&config, text, image.as_deref()).await
        }
        Some(Commands::Message { json, base_url }) => {
            override_base_url(&mut config, base_url);
            validate(&config)?;
            handle_message(&config, json).await
        }
        Some(Commands::Health { base_url }) => {
            override_base_url(&mut config, base_url);
            validate(&config)?;
            handle_health(&config).await
        }
    }
}

fn override_base_url(config: &mut Config, base_url: Option<String>) {
    if let Some(base_url) = base_url {
        config.upstream.base_url = base_url;
    }
}

/// Validate the effective configuration, logging warnings and failing on errors.
fn validate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config)?.into_result()?;
    for warning in warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    Ok(())
}
