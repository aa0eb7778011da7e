//! OpenAI chat-completions provider for the ELI5 Buddy proxy.

mod api;
mod converter;
mod provider;

pub use provider::{DEFAULT_API_URL, OpenAIProvider};
