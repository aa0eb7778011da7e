//! Error types for the ELI5 Buddy protocol layer.

mod explain;
mod provider;

pub use explain::*;
pub use provider::*;
