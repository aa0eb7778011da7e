//! Conversion between protocol types and the OpenAI wire format.

use eli5_protocols::error::ProviderError;
use eli5_protocols::provider::{CompletionRequest, CompletionResponse};
use eli5_protocols::types::{
    ContentPart as ProtoContentPart, Message, MessageContent, MessageRole, StopReason, Usage,
};

use crate::api::{
    ApiMessage, ApiRequest, ApiResponse, ContentPart, ImageUrl,
    MessageContent as ApiMessageContent, ResponseFormat,
};

pub fn build_request(request: &CompletionRequest) -> ApiRequest {
    ApiRequest {
        model: request.model.clone(),
        messages: convert_messages(&request.messages),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format: request.json_mode.then(ResponseFormat::json_object),
    }
}

/// Convert protocol messages to OpenAI API format.
pub fn convert_messages(messages: &[Message]) -> Vec<ApiMessage> {
    messages.iter().map(convert_message).collect()
}

fn convert_message(msg: &Message) -> ApiMessage {
    let role = match msg.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    };

    let content = match &msg.content {
        MessageContent::Text(text) => ApiMessageContent::Text(text.clone()),
        MessageContent::Parts(parts) => ApiMessageContent::Parts(convert_parts(parts)),
    };

    ApiMessage {
        role: role.to_string(),
        content,
    }
}

fn convert_parts(parts: &[ProtoContentPart]) -> Vec<ContentPart> {
    parts
        .iter()
        .map(|part| match part {
            ProtoContentPart::Text { text } => ContentPart::Text { text: text.clone() },
            ProtoContentPart::Image { source } => ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: source.to_url(),
                    detail: None,
                },
            },
        })
        .collect()
}

/// Take the first choice; a missing or blank content is an empty response.
pub fn parse_response(response: ApiResponse) -> Result<CompletionResponse, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)?;

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        id: response.id,
        model: response.model,
        message: Message::assistant(content),
        stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiUsage, Choice, ResponseMessage};
    use eli5_protocols::types::ImageSource;

    fn api_response(content: Option<&str>) -> ApiResponse {
        ApiResponse {
            id: "chatcmpl-1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".to_string(),
                    content: content.map(str::to_string),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(ApiUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        }
    }

    #[test]
    fn test_convert_system_and_user() {
        let messages = convert_messages(&[Message::system("Be simple"), Message::user("Explain DNS")]);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_convert_image_message() {
        let msg = Message::user_with_image(
            "Read this",
            ImageSource::from_data_uri("data:image/jpeg;base64,/9j/"),
        );
        let json = serde_json::to_value(convert_messages(&[msg])).unwrap();
        assert_eq!(json[0]["content"][1]["image_url"]["url"], "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_build_request_json_mode() {
        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("hi")]).with_json_mode();
        let json = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");

        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("hi")]);
        let json = serde_json::to_value(build_request(&request)).unwrap();
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_parse_response() {
        let response = parse_response(api_response(Some("Cats purr when happy."))).unwrap();
        assert_eq!(response.text(), "Cats purr when happy.");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[test]
    fn test_parse_response_empty_content() {
        assert!(matches!(
            parse_response(api_response(None)),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(api_response(Some("  "))),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_response_no_choices() {
        let mut response = api_response(Some("x"));
        response.choices.clear();
        assert!(matches!(parse_response(response), Err(ProviderError::EmptyResponse)));
    }
}
