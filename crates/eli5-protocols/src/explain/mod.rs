//! Explanation data model.
//!
//! All values here are call-scoped: they are created for a single
//! orchestrated request and dropped when it completes.

mod message;
mod recovery;
mod request;
mod result;
mod upstream;

pub use message::*;
pub use recovery::*;
pub use request::*;
pub use result::*;
pub use upstream::*;
