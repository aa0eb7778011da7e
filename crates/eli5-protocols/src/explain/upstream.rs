//! Transient values describing the upstream exchange.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw HTTP response captured before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status_code: u16,
    pub raw_body: String,
    pub content_type: Option<String>,
}

impl UpstreamResponse {
    pub fn new(status_code: u16, raw_body: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            status_code,
            raw_body: raw_body.into(),
            content_type,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Result of a single reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Probe answered with a success status.
    Healthy,
    /// Probe answered, but not with a success status.
    Unhealthy,
    /// Probe failed outright (connection error or timeout).
    Unreachable,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}
