// ABOUTME: HTTP tests driving the ofd-server router in-process.
// ABOUTME: Covers health, Basic auth, request validation, body limits and the response shape.

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, WWW_AUTHENTICATE};
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ofd_extract::Extractor;
use ofd_server::{app, AppState, Credentials};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const MAX_BODY: usize = 64 * 1024;

fn test_app() -> Router {
    let state = AppState::new(Extractor::default(), Credentials::new("admin", "password"));
    app(state, MAX_BODY)
}

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

fn extract_request(auth: Option<&str>, body: impl Into<String>) -> Request<Body> {
    let body = body.into();
    let mut builder = Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, body.len());
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_needs_no_auth() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "healthy"}));
}

#[tokio::test]
async fn extract_text_end_to_end() {
    let body = json!({
        "html": "<html><body><h1>Title</h1><p>Content</p><script>alert(1)</script></body></html>"
    })
    .to_string();
    let (status, json) = send(extract_request(Some(&basic("admin", "password")), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"text": "Title Content", "length": 13, "links": {}}));
}

#[tokio::test]
async fn extract_text_returns_links() {
    let body = json!({
        "html": r#"<div id="fido_cheque_container">&lt;p&gt;Итого 100&lt;/p&gt;</div>
                   <a href="https://ofd.ru/web/noauth/cheque/pdf?id=9">PDF</a>
                   <a href="https://check.nalog.gov.ru/?fn=1">ФНС</a>"#
    })
    .to_string();
    let (status, json) = send(extract_request(Some(&basic("admin", "password")), body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "Итого 100");
    assert_eq!(json["length"], 9);
    assert_eq!(
        json["links"],
        json!({
            "pdf": "https://ofd.ru/web/noauth/cheque/pdf?id=9",
            "fns": "https://check.nalog.gov.ru/?fn=1"
        })
    );
}

#[tokio::test]
async fn missing_credentials_are_challenged() {
    let response = test_app()
        .oneshot(extract_request(None, r#"{"html": "<p>x</p>"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(WWW_AUTHENTICATE).unwrap(),
        r#"Basic realm="Login Required""#
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, json!({"error": "Authentication required"}));
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    for auth in [
        basic("admin", "wrong"),
        basic("root", "password"),
        "Bearer token".to_string(),
        "Basic not-base64".to_string(),
    ] {
        let (status, _) = send(extract_request(Some(&auth), r#"{"html": "<p>x</p>"}"#)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "auth: {}", auth);
    }
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let cases = [
        ("", "No JSON data provided"),
        ("not json", "No JSON data provided"),
        ("[]", "No JSON data provided"),
        ("null", "No JSON data provided"),
        ("[1, 2]", "Missing 'html' field in request"),
        (r#""html""#, "Missing 'html' field in request"),
        ("{}", "No JSON data provided"),
        (r#"{"text": "x"}"#, "Missing 'html' field in request"),
        (r#"{"html": 42}"#, "Invalid 'html' field"),
        (r#"{"html": ""}"#, "Invalid 'html' field"),
    ];
    for (body, message) in cases {
        let (status, json) = send(extract_request(Some(&basic("admin", "password")), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(json, json!({"error": message}), "body: {}", body);
    }
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let html = "<p>x</p>".repeat(MAX_BODY / 4);
    let body = json!({ "html": html }).to_string();
    let response = test_app()
        .oneshot(extract_request(Some(&basic("admin", "password")), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn get_on_extract_text_is_not_allowed() {
    let request = Request::builder()
        .uri("/extract-text")
        .header(AUTHORIZATION, basic("admin", "password"))
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
