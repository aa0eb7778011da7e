//! # ELI5 Buddy Core
//!
//! The fault-tolerant explanation pipeline:
//!
//! - [`health`] - upstream reachability probe
//! - [`upstream`] - single-shot HTTP client for the explanation proxy
//! - [`normalizer`] - validates raw responses into explanation payloads
//! - [`recovery`] - ordered extraction strategies for garbled JSON
//! - [`fallback`] - deterministic, network-free explanations
//! - [`orchestrator`] - sequences the above for one request
//! - [`message`] - dispatch of UI messages

pub mod fallback;
pub mod health;
pub mod message;
pub mod normalizer;
pub mod orchestrator;
pub mod recovery;
pub mod upstream;

pub use fallback::LocalFallback;
pub use health::HealthProber;
pub use message::dispatch;
pub use normalizer::normalize;
pub use orchestrator::ExplanationOrchestrator;
pub use recovery::recover;
pub use upstream::UpstreamClient;
