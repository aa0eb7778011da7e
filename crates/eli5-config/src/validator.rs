//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;
use url::Url;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError::InvalidValue`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const LONG_TIMEOUT_SECS: u64 = 300;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_upstream(config, &mut result);
        Self::validate_explain(config, &mut result);
        Self::validate_fallback(config, &mut result);
        Self::validate_providers(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_upstream(config: &Config, result: &mut ValidationResult) {
        let upstream = &config.upstream;

        if !is_http_url(&upstream.base_url) {
            result.add_error(ValidationError::new(
                "upstream.base_url",
                "base_url must be an http:// or https:// URL",
            ));
        }

        if !upstream.health_path.starts_with('/') {
            result.add_error(ValidationError::new(
                "upstream.health_path",
                "health_path must start with '/'",
            ));
        }

        for (path, secs) in [
            ("upstream.health_timeout_secs", upstream.health_timeout_secs),
            ("upstream.request_timeout_secs", upstream.request_timeout_secs),
        ] {
            if secs == 0 {
                result.add_error(ValidationError::new(path, "timeout must be greater than 0"));
            } else if secs > LONG_TIMEOUT_SECS {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("timeout is very high (>{}s), requests may hang", LONG_TIMEOUT_SECS),
                ));
            }
        }
    }

    fn validate_explain(config: &Config, result: &mut ValidationResult) {
        let explain = &config.explain;

        if explain.model.is_empty() {
            result.add_error(ValidationError::new("explain.model", "model cannot be empty"));
        }

        if explain.vision_model.is_empty() {
            result.add_error(ValidationError::new(
                "explain.vision_model",
                "vision_model cannot be empty",
            ));
        }

        if explain.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "explain.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&explain.temperature) {
            result.add_error(ValidationError::new(
                "explain.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if explain.min_text_chars > explain.max_text_chars {
            result.add_error(ValidationError::new(
                "explain.min_text_chars",
                format!(
                    "min_text_chars ({}) exceeds max_text_chars ({})",
                    explain.min_text_chars, explain.max_text_chars
                ),
            ));
        }
    }

    fn validate_fallback(config: &Config, result: &mut ValidationResult) {
        if config.fallback.excerpt_chars == 0 {
            result.add_error(ValidationError::new(
                "fallback.excerpt_chars",
                "excerpt_chars must be greater than 0",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if provider.api_key().is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.api_key", name),
                    "API key is not set, may need to be set via environment variable",
                ));
            }

            if let Some(ref url) = provider.base_url {
                if !is_http_url(url) {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
