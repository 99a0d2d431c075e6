mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::*;
use playbook_qa::api::build_router;
use playbook_qa::api::handlers::AppState;
use playbook_qa::models::AnswerMode;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

fn router(service: &TestService, timeout: Duration) -> Router {
    build_router(AppState::new(service.storage.clone(), timeout), true)
}

fn post_query(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/qa/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_placeholder_query_returns_test() {
    let service = test_service(AnswerMode::Placeholder, ScriptedGenerator::answering("unused")).await;
    let app = router(&service, Duration::from_secs(60));

    let (status, body) = send(app, post_query(r#"{"question": "What is the entry rule?"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": "test"}));
}

#[tokio::test]
async fn test_generate_query_returns_model_answer() {
    let service = test_service(
        AnswerMode::Generate,
        ScriptedGenerator::answering("Enter on a close outside the range."),
    )
    .await;
    let app = router(&service, Duration::from_secs(60));

    let (status, body) = send(app, post_query(r#"{"question": "What is the entry rule?"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": "Enter on a close outside the range."}));
    assert!(service.generator.prompts()[0].contains("opening range"));
}

#[tokio::test]
async fn test_missing_question_is_rejected_before_answering() {
    let service = test_service(AnswerMode::Generate, ScriptedGenerator::answering("unused")).await;
    let app = router(&service, Duration::from_secs(60));

    let (status, body) = send(app, post_query(r#"{"query": "What is the entry rule?"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("question")));
    assert_eq!(service.embedder.query_calls(), 0);
    assert_eq!(service.generator.started(), 0);
}

#[tokio::test]
async fn test_malformed_payloads_are_unprocessable() {
    let service = test_service(AnswerMode::Generate, ScriptedGenerator::answering("unused")).await;

    for payload in [r#"{"question": 42}"#, "not json"] {
        let (status, body) = send(router(&service, Duration::from_secs(60)), post_query(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "payload: {payload}");
        assert!(body["detail"].is_string());
    }

    let without_content_type = Request::builder()
        .method(Method::POST)
        .uri("/qa/query")
        .body(Body::from(r#"{"question": "What is the entry rule?"}"#))
        .unwrap();
    let (status, _) = send(router(&service, Duration::from_secs(60)), without_content_type).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(service.generator.started(), 0);
}

#[tokio::test]
async fn test_slow_answer_times_out_with_504() {
    let service = test_service(
        AnswerMode::Generate,
        ScriptedGenerator::slow(Duration::from_secs(30)),
    )
    .await;
    let app = router(&service, Duration::from_millis(50));

    let started = std::time::Instant::now();
    let (status, body) = send(app, post_query(r#"{"question": "What is the entry rule?"}"#)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("timed out")));
    assert!(started.elapsed() < Duration::from_secs(5));
    // Generation started but never completed
    assert_eq!(service.generator.started(), 1);
    assert!(service.generator.prompts().is_empty());
}

#[tokio::test]
async fn test_generation_failure_is_internal_error() {
    let service = test_service(AnswerMode::Generate, ScriptedGenerator::failing()).await;
    let app = router(&service, Duration::from_secs(60));

    let (status, body) = send(app, post_query(r#"{"question": "What is the entry rule?"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("model unavailable")));
}

#[tokio::test]
async fn test_cors_preflight_from_any_origin_allows_credentials() {
    let service = test_service(AnswerMode::Placeholder, ScriptedGenerator::answering("unused")).await;
    let app = router(&service, Duration::from_secs(60));

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/qa/query")
        .header(header::ORIGIN, "https://dashboard.example.org")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-trace-id")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(preflight).await.unwrap();
    let headers = response.headers();

    assert!(response.status().is_success());
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://dashboard.example.org"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "content-type,x-trace-id"
    );
}

#[tokio::test]
async fn test_cross_origin_post_echoes_origin() {
    let service = test_service(AnswerMode::Placeholder, ScriptedGenerator::answering("unused")).await;
    let app = router(&service, Duration::from_secs(60));

    let mut request = post_query(r#"{"question": "What is the entry rule?"}"#);
    request
        .headers_mut()
        .insert(header::ORIGIN, "http://localhost:3000".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_health() {
    let service = test_service(AnswerMode::Placeholder, ScriptedGenerator::answering("unused")).await;
    let app = router(&service, Duration::from_secs(60));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
