//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use eli5_config::ExplainConfig;
use eli5_protocols::LLMProvider;

/// Application state shared across handlers.
pub struct AppState {
    pub provider: Arc<dyn LLMProvider>,
    pub explain: ExplainConfig,
    pub started_at: DateTime<Utc>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(provider: Arc<dyn LLMProvider>, explain: ExplainConfig) -> Self {
        Self {
            provider,
            explain,
            started_at: Utc::now(),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
