//! Conversation types shared by LLM providers.

mod common;
mod content;
mod message;

pub use common::*;
pub use content::*;
pub use message::*;
