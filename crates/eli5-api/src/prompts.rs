//! Prompts and completion requests sent to the provider.

use eli5_config::ExplainConfig;
use eli5_protocols::{CompletionRequest, ImageSource, Message};

pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are a helpful assistant that explains complex topics \
in simple terms that a 5-year-old could understand. Keep your explanations concise and under 150 \
words. DO NOT include any other text or comments. Just the explanation.";

pub const IMAGE_SYSTEM_PROMPT: &str = "You are a helpful assistant that reads images and explains \
them in simple terms that a 5-year-old could understand. First transcribe any text visible in the \
image, then explain what the image shows in under 150 words. Reply with a JSON object of the form \
{\"extractedText\": \"...\", \"explanation\": \"...\"} and nothing else.";

const IMAGE_USER_PROMPT: &str = "Extract the text from this image and explain it in simple terms.";

pub const MIN_FLASHCARDS: u32 = 1;
pub const MAX_FLASHCARDS: u32 = 20;
pub const DEFAULT_FLASHCARDS: u32 = 5;

/// Flashcard difficulty; anything unrecognised is intermediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("basic") => Self::Basic,
            Some("advanced") => Self::Advanced,
            _ => Self::Intermediate,
        }
    }

    pub fn preamble(self) -> &'static str {
        match self {
            Self::Basic => "Create simple, fundamental flashcards suitable for beginners.",
            Self::Intermediate => {
                "Create moderately challenging flashcards that balance fundamental and advanced concepts."
            }
            Self::Advanced => {
                "Create advanced, detailed flashcards that explore deeper concepts and nuances."
            }
        }
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

pub fn explain_request(config: &ExplainConfig, text: &str) -> CompletionRequest {
    CompletionRequest::new(
        config.model.clone(),
        vec![
            Message::system(EXPLAIN_SYSTEM_PROMPT),
            Message::user(format!("Please explain this in simple terms: {text}")),
        ],
    )
    .with_max_tokens(config.max_tokens)
    .with_temperature(config.temperature)
}

pub fn image_request(config: &ExplainConfig, image_data_uri: &str) -> CompletionRequest {
    CompletionRequest::new(
        config.vision_model.clone(),
        vec![
            Message::system(IMAGE_SYSTEM_PROMPT),
            Message::user_with_image(IMAGE_USER_PROMPT, ImageSource::from_data_uri(image_data_uri)),
        ],
    )
    .with_max_tokens(config.max_tokens)
    .with_temperature(config.temperature)
    .with_json_mode()
}

pub fn flashcards_request(
    config: &ExplainConfig,
    text: &str,
    count: u32,
    difficulty: Difficulty,
) -> CompletionRequest {
    let system = format!(
        "You are an expert educator who creates effective flashcards for learning and memorization. {} \
         Format your response as a JSON array with exactly {count} flashcards, each with 'front' and 'back' properties. \
         The 'front' should be a concise question or concept, and the 'back' should be a clear, concise answer or explanation. \
         Make sure your response is valid JSON.",
        difficulty.preamble()
    );
    CompletionRequest::new(
        config.model.clone(),
        vec![
            Message::system(system),
            Message::user(format!(
                "Create {count} flashcards for studying and memorizing the key concepts in this text: {text}"
            )),
        ],
    )
    .with_temperature(config.temperature)
}
