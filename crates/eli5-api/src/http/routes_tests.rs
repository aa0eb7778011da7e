use super::*;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use eli5_config::ExplainConfig;
use eli5_protocols::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, ProviderError, StopReason, Usage,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Provider that replays a canned reply and records every request.
struct MockProvider {
    reply: Result<String, (u16, String)>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, message.to_string())),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(content) => Ok(CompletionResponse {
                id: "mock-1".to_string(),
                model: request.model,
                message: Message::assistant(content.clone()),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            Err((status, message)) => Err(ProviderError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

fn router_with(provider: Arc<MockProvider>) -> Router {
    create_router(Arc::new(AppState::new(provider, ExplainConfig::default())))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = router_with(MockProvider::replying("unused"));
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "message": "Proxy server is running"}));
}

#[tokio::test]
async fn test_explain_success() {
    let provider = MockProvider::replying("  The moon reflects sunlight.  ");
    let app = router_with(provider.clone());

    let (status, body) = post_json(app, "/api/explain", json!({"text": "Why does the moon shine?"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"explanation": "The moon reflects sunlight."}));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-3.5-turbo");
    assert_eq!(
        requests[0].messages[1].content.text(),
        "Please explain this in simple terms: Why does the moon shine?"
    );
}

#[tokio::test]
async fn test_explain_missing_text() {
    let provider = MockProvider::replying("unused");
    let (status, body) = post_json(router_with(provider.clone()), "/api/explain", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_body_gets_error_json() {
    let provider = MockProvider::replying("unused");
    let response = router_with(provider.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/explain")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text": "unterminated"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_gets_error_json() {
    let provider = MockProvider::replying("unused");
    let response = router_with(provider.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/extract-and-explain")
                .body(Body::from(r#"{"imageData": "data:image/png;base64,AAAA"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_explain_text_too_short() {
    let provider = MockProvider::replying("unused");
    let (status, body) = post_json(router_with(provider.clone()), "/api/explain", json!({"text": "short"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text too short. Please provide more content.");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_explain_truncates_long_text() {
    let provider = MockProvider::replying("ok");
    let long_text = "a".repeat(6000);
    let (status, _) = post_json(router_with(provider.clone()), "/api/explain", json!({"text": long_text})).await;
    assert_eq!(status, StatusCode::OK);

    let prompt = provider.requests()[0].messages[1].content.text();
    let sent = prompt.trim_start_matches("Please explain this in simple terms: ");
    assert_eq!(sent.len(), 5000);
}

#[tokio::test]
async fn test_explain_provider_error() {
    let provider = MockProvider::failing(401, "Incorrect API key provided");
    let (status, body) = post_json(
        router_with(provider),
        "/api/explain",
        json!({"text": "Explain the water cycle"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Incorrect API key provided");
}

#[tokio::test]
async fn test_extract_and_explain() {
    let provider = MockProvider::replying(r#"{"extractedText": "H2O", "explanation": "Water!"}"#);
    let (status, body) = post_json(
        router_with(provider.clone()),
        "/api/extract-and-explain",
        json!({"imageData": "data:image/png;base64,iVBORw0KGgo="}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"explanation": "Water!", "extractedText": "H2O"}));

    let requests = provider.requests();
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert!(requests[0].json_mode);
}

#[tokio::test]
async fn test_explain_image_alias_plain_reply() {
    let provider = MockProvider::replying("It is a drawing of a tree.");
    let (status, body) = post_json(
        router_with(provider),
        "/api/explain-image",
        json!({"imageData": "data:image/jpeg;base64,/9j/4AAQ"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"], "It is a drawing of a tree.");
    assert_eq!(body["extractedText"], "");
}

#[tokio::test]
async fn test_image_validation() {
    let provider = MockProvider::replying("unused");

    let (status, body) = post_json(router_with(provider.clone()), "/api/extract-and-explain", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image data provided");

    let (status, body) = post_json(
        router_with(provider.clone()),
        "/api/extract-and-explain",
        json!({"imageData": "https://example.com/cat.png"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid image data");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_flashcards_parsed() {
    let provider = MockProvider::replying(
        r#"Sure! [{"front": "What is DNA?", "back": "Instructions for life"}]"#,
    );
    let (status, body) = post_json(
        router_with(provider.clone()),
        "/api/flashcards",
        json!({"text": "DNA carries genetic information", "count": 100, "difficulty": "advanced"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcards"][0]["front"], "What is DNA?");

    let system = provider.requests()[0].messages[0].content.text();
    assert!(system.contains("exactly 20 flashcards"));
    assert!(system.contains("deeper concepts and nuances"));
}

#[tokio::test]
async fn test_flashcards_raw_reply() {
    let provider = MockProvider::replying("I could not produce cards.");
    let (status, body) = post_json(
        router_with(provider),
        "/api/flashcards",
        json!({"text": "Some study material"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcards"], "I could not produce cards.");
}

#[tokio::test]
async fn test_stats_counts_requests() {
    let state = Arc::new(AppState::new(MockProvider::replying("ok"), ExplainConfig::default()));
    let app = create_router(state.clone());

    post_json(app.clone(), "/api/explain", json!({"text": "Count this request please"})).await;
    let response = app
        .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_count"], 1);
    assert_eq!(body["provider"], "mock");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = router_with(MockProvider::replying("unused"));
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/explain")
                .header("origin", "chrome-extension://abcdef")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
