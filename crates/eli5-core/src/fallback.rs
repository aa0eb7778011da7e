//! Local fallback generator.
//!
//! Pure and deterministic; used whenever the upstream path cannot produce a
//! trustworthy result.

use eli5_config::FallbackConfig;
use eli5_protocols::{ExplanationRequest, ExplanationResult, RequestKind};

pub const ELLIPSIS: &str = "...";

pub const IMAGE_FALLBACK_EXPLANATION: &str = "I can see you're trying to explain an image. \
Due to current server constraints, we're using a simplified explanation. \
We're actively improving our image processing capabilities.";

pub const IMAGE_FALLBACK_EXTRACTED_TEXT: &str = "Image content";

/// Builds network-free explanations.
#[derive(Debug, Clone)]
pub struct LocalFallback {
    excerpt_chars: usize,
}

impl LocalFallback {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            excerpt_chars: config.excerpt_chars,
        }
    }

    /// Fixed apology that quotes the first `excerpt_chars` characters of the input.
    pub fn local_text(&self, original: &str) -> String {
        format!(
            "Sorry, the explanation service isn't available right now, so here's a quick \
             look instead. You selected: \"{}\". Try again in a moment and I'll explain it \
             in simple words.",
            self.excerpt(original)
        )
    }

    pub fn local_image(&self) -> ExplanationResult {
        ExplanationResult::local(
            IMAGE_FALLBACK_EXPLANATION,
            Some(IMAGE_FALLBACK_EXTRACTED_TEXT.to_string()),
        )
    }

    pub fn for_request(&self, request: &ExplanationRequest) -> ExplanationResult {
        match request.kind {
            RequestKind::Text => ExplanationResult::local(self.local_text(&request.payload), None),
            RequestKind::Image => self.local_image(),
        }
    }

    /// Character-based so multi-byte text is never split mid-codepoint.
    fn excerpt(&self, text: &str) -> String {
        let text = text.trim();
        match text.char_indices().nth(self.excerpt_chars) {
            Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
            None => text.to_string(),
        }
    }
}

impl Default for LocalFallback {
    fn default() -> Self {
        Self::new(&FallbackConfig::default())
    }
}
