use super::*;
use std::time::Duration;

use eli5_protocols::ErrorKind;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fallback::{IMAGE_FALLBACK_EXPLANATION, IMAGE_FALLBACK_EXTRACTED_TEXT};

fn orchestrator_for(base_url: String) -> ExplanationOrchestrator {
    let upstream = UpstreamConfig {
        base_url,
        health_timeout_secs: 1,
        request_timeout_secs: 2,
        ..Default::default()
    };
    ExplanationOrchestrator::new(&upstream, &FallbackConfig::default())
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn mount_explain(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn lorem(len: usize) -> String {
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

#[tokio::test]
async fn test_upstream_success() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"explanation": "Plants eat sunlight."})),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Photosynthesis is a process"))
        .await
        .unwrap();
    assert_eq!(result.explanation, "Plants eat sunlight.");
    assert!(!result.is_local_fallback);
}

#[tokio::test]
async fn test_unreachable_uses_truncated_fallback() {
    let input = lorem(350);
    let result = orchestrator_for("http://127.0.0.1:1".to_string())
        .explain(&ExplanationRequest::text(input.clone()))
        .await
        .unwrap();

    assert!(result.is_local_fallback);
    assert!(result.explanation.contains(&format!("{}...", &input[..300])));
    assert!(!result.explanation.contains(&input[..301]));
}

#[tokio::test]
async fn test_unhealthy_skips_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Black holes are dense"))
        .await
        .unwrap();
    assert!(result.is_local_fallback);
}

#[tokio::test]
async fn test_upstream_error_status_falls_back() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to generate explanation"})),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Quantum entanglement"))
        .await
        .unwrap();
    assert!(result.is_local_fallback);
    assert!(result.explanation.contains("Quantum entanglement"));
}

#[tokio::test]
async fn test_html_body_falls_back() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200).set_body_raw("<!DOCTYPE html><h1>Bad Gateway</h1>", "application/json"),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Plate tectonics explained"))
        .await
        .unwrap();
    assert!(result.is_local_fallback);
}

#[tokio::test]
async fn test_missing_field_falls_back() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"answer": "wrong key"})),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Inflation and prices"))
        .await
        .unwrap();
    assert!(result.is_local_fallback);
}

#[tokio::test]
async fn test_garbled_body_is_recovered() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200)
            .set_body_raw(r#"data: {"explanation":"Volcanoes are hot mountains."} [DONE]"#, "application/json"),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("Volcanic eruptions occur"))
        .await
        .unwrap();
    assert_eq!(result.explanation, "Volcanoes are hot mountains.");
    assert!(!result.is_local_fallback);
}

#[tokio::test]
async fn test_image_success_keeps_extracted_text() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/api/extract-and-explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"explanation": "It is a chart.", "extractedText": "Q1 sales"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::image("data:image/png;base64,iVBORw0KGgo="))
        .await
        .unwrap();
    assert_eq!(result.extracted_text.as_deref(), Some("Q1 sales"));
    assert!(!result.is_local_fallback);
}

#[tokio::test]
async fn test_image_unreachable_uses_image_fallback() {
    let result = orchestrator_for("http://127.0.0.1:1".to_string())
        .explain(&ExplanationRequest::image("data:image/png;base64,iVBORw0KGgo="))
        .await
        .unwrap();
    assert!(result.is_local_fallback);
    assert_eq!(result.explanation, IMAGE_FALLBACK_EXPLANATION);
    assert_eq!(result.extracted_text.as_deref(), Some(IMAGE_FALLBACK_EXTRACTED_TEXT));
}

#[tokio::test]
async fn test_invalid_input_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(server.uri());
    let err = orchestrator
        .explain(&ExplanationRequest::image("not-a-data-uri"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = orchestrator
        .explain(&ExplanationRequest::text(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_cancellation_is_surfaced() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"explanation": "too late"}))
            .set_delay(Duration::from_millis(1500)),
    )
    .await;

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    let err = orchestrator_for(server.uri())
        .explain_with_cancel(&ExplanationRequest::text("Cancel this one"), &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"explanation": "ok"})))
        .expect(2)
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(server.uri());
    let a = ExplanationRequest::text("First request text");
    let b = ExplanationRequest::text("Second request text");
    let (ra, rb) = tokio::join!(orchestrator.explain(&a), orchestrator.explain(&b));
    assert_eq!(ra.unwrap().explanation, "ok");
    assert_eq!(rb.unwrap().explanation, "ok");
}

#[tokio::test]
async fn test_whitespace_text_falls_back_when_unreachable() {
    let result = orchestrator_for("http://127.0.0.1:1".to_string())
        .explain(&ExplanationRequest::text("   "))
        .await
        .unwrap();

    assert!(result.is_local_fallback);
    assert!(!result.explanation.is_empty());
}

#[tokio::test]
async fn test_truncated_body_with_inner_array_keeps_explanation() {
    let server = healthy_server().await;
    mount_explain(
        &server,
        ResponseTemplate::new(200).set_body_raw(
            r#"{"explanation": "Lists like [1, 2] are boxes", "more": tru"#,
            "application/json",
        ),
    )
    .await;

    let result = orchestrator_for(server.uri())
        .explain(&ExplanationRequest::text("What is a list in programming?"))
        .await
        .unwrap();
    assert_eq!(result.explanation, "Lists like [1, 2] are boxes");
    assert!(!result.is_local_fallback);
}
