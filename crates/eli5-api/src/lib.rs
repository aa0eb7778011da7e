//! # ELI5 Buddy API
//!
//! The thin HTTP proxy the browser extension talks to. It validates and
//! reshapes requests, forwards them to an [`LLMProvider`], and returns
//! `{ explanation }` / `{ error }` JSON.
//!
//! ```text
//! extension ──HTTP──▶ eli5-api ──LLMProvider──▶ chat-completions API
//! ```
//!
//! [`LLMProvider`]: eli5_protocols::LLMProvider

pub mod error;
pub mod http;
pub mod prompts;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::ProxyServer;
pub use state::AppState;
