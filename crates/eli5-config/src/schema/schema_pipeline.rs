//! Explanation pipeline configuration (upstream client, prompts, fallback).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the explanation client sends its requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the explanation proxy.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path probed before every explanation.
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Enforced timeout for the health probe.
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,

    /// Enforced timeout for the explanation call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            health_path: default_health_path(),
            health_timeout_secs: default_health_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

fn default_health_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

/// Prompt parameters and input limits used by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// Model for text explanations and flashcards.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model for image explanations.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Shorter text is rejected with 400.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Longer text is truncated before it reaches the model.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            vision_model: default_vision_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            min_text_chars: default_min_text_chars(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_vision_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_min_text_chars() -> usize {
    10
}

fn default_max_text_chars() -> usize {
    5000
}

/// Local fallback generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// How much of the selected text is echoed back.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_excerpt_chars() -> usize {
    300
}
