//! LLM Provider protocol definitions.
//!
//! Providers connect the proxy to an LLM API and turn a prompt into the
//! model's reply.

mod request;
mod response;
mod traits;

pub use request::*;
pub use response::*;
pub use traits::*;
