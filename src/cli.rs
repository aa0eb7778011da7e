//! CLI definitions for ELI5 Buddy.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ELI5 Buddy CLI.
#[derive(Parser)]
#[command(name = "eli5-buddy")]
#[command(about = "Explain anything like I'm five")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ELI5_CONFIG", default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the explanation proxy in foreground (default)
    Serve {
        /// Server host
        #[arg(long, env = "ELI5_HOST")]
        host: Option<String>,

        /// Server port
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Explain a piece of text or an image once
    Explain {
        /// Text to explain (read from stdin when omitted)
        text: Option<String>,

        /// Image file to extract and explain (png, jpeg, gif, webp)
        #[arg(long, conflicts_with = "text")]
        image: Option<PathBuf>,

        /// Base URL of the explanation service
        #[arg(long, env = "ELI5_BASE_URL")]
        base_url: Option<String>,
    },

    /// Dispatch a raw extension message and print the reply
    Message {
        /// Message JSON (read from stdin when omitted)
        #[arg(long)]
        json: Option<String>,

        /// Base URL of the explanation service
        #[arg(long, env = "ELI5_BASE_URL")]
        base_url: Option<String>,
    },

    /// Probe the explanation service once
    Health {
        /// Base URL of the explanation service
        #[arg(long, env = "ELI5_BASE_URL")]
        base_url: Option<String>,
    },
}
