//! Message content types.

use serde::{Deserialize, Serialize};

/// Content of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content of the message.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A part of a message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { source: ImageSource },
}

/// Image source for multimodal content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

impl ImageSource {
    /// Split a `data:<media>;base64,<data>` URI. Anything else is passed as a URL.
    pub fn from_data_uri(uri: &str) -> Self {
        let parsed = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .and_then(|(meta, data)| {
                meta.strip_suffix(";base64")
                    .map(|media_type| (media_type.to_string(), data.to_string()))
            });

        match parsed {
            Some((media_type, data)) => Self::Base64 { media_type, data },
            None => Self::Url {
                url: uri.to_string(),
            },
        }
    }

    /// Render back to something an OpenAI-style `image_url` accepts.
    pub fn to_url(&self) -> String {
        match self {
            Self::Base64 { media_type, data } => format!("data:{media_type};base64,{data}"),
            Self::Url { url } => url.clone(),
        }
    }
}
