use super::*;
use crate::router::navigator::Navigator;
use crate::session::Role;
use crate::session::store::{TOKEN_KEY, USER_KEY};
use crate::session::storage::Storage;
use crate::test_helpers::{client_for, record, spawn_backend};
use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// MOCK BACKEND
// =============================================================================

fn header(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_owned()))
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "authorization": header(&headers, "authorization"),
        "contentType": header(&headers, "content-type"),
    }))
}

async fn echo_body(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "body": body, "contentType": header(&headers, "content-type") }))
}

async fn echo_query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!(params))
}

async fn interviews(headers: HeaderMap) -> impl IntoResponse {
    if header(&headers, "authorization") == json!("Bearer expired-token") {
        return (AxumStatus::UNAUTHORIZED, Json(json!({ "message": "token expired" }))).into_response();
    }
    Json(json!([{ "id": 1 }])).into_response()
}

async fn publish() -> impl IntoResponse {
    (AxumStatus::BAD_REQUEST, Json(json!({ "message": "title required" })))
}

async fn plain_failure() -> impl IntoResponse {
    (AxumStatus::INTERNAL_SERVER_ERROR, "stack trace goes here")
}

async fn no_content() -> impl IntoResponse {
    AxumStatus::NO_CONTENT
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "late": true }))
}

async fn plain_text() -> &'static str {
    "Interview cancelled"
}

async fn login_rejected() -> impl IntoResponse {
    (AxumStatus::UNAUTHORIZED, Json(json!({ "message": "Bad credentials" })))
}

fn backend() -> Router {
    Router::new()
        .route("/api/echo/headers", get(echo_headers).delete(echo_headers))
        .route("/api/echo/body", post(echo_body).put(echo_body))
        .route("/api/echo/query", get(echo_query))
        .route("/api/echo/upload", post(echo_headers))
        .route("/api/hr/interviews", get(interviews))
        .route("/api/hr/joboffers/publish", post(publish))
        .route("/api/broken", get(plain_failure))
        .route("/api/empty", axum::routing::delete(no_content))
        .route("/api/slow", get(slow))
        .route("/api/auth/login", post(login_rejected))
        .route("/api/text", axum::routing::put(plain_text))
}

// =============================================================================
// PURE HELPERS
// =============================================================================

#[test]
fn error_message_prefers_json_message() {
    assert_eq!(error_message(400, r#"{"message":"title required"}"#), "title required");
}

#[test]
fn error_message_falls_back_on_non_json() {
    assert_eq!(error_message(502, "<html>bad gateway</html>"), "HTTP error 502");
}

#[test]
fn error_message_falls_back_on_blank_or_missing_message() {
    assert_eq!(error_message(409, r#"{"message":"  "}"#), "HTTP error 409");
    assert_eq!(error_message(404, r#"{"error":"nope"}"#), "HTTP error 404");
    assert_eq!(error_message(500, r#"{"message":42}"#), "HTTP error 500");
}

#[test]
fn decode_body_treats_empty_as_null() {
    let value: Value = decode_body("").unwrap();
    assert_eq!(value, Value::Null);
    let unit: Option<u8> = decode_body("  ").unwrap();
    assert_eq!(unit, None);
}

#[test]
fn decode_body_reports_shape_mismatch() {
    assert!(matches!(decode_body::<Vec<u8>>("{\"a\":1}"), Err(ApiError::Decode(_))));
}

// =============================================================================
// HEADERS
// =============================================================================

#[tokio::test]
async fn bearer_header_sent_only_with_token() {
    let t = client_for(&spawn_backend(backend()).await);

    let with: Value = t.client.get("/echo/headers", Some("abc")).await.unwrap();
    assert_eq!(with["authorization"], "Bearer abc");
    assert_eq!(with["contentType"], "application/json");

    let without: Value = t.client.get("/echo/headers", None).await.unwrap();
    assert_eq!(without["authorization"], Value::Null);

    let empty: Value = t.client.get("/echo/headers", Some("")).await.unwrap();
    assert_eq!(empty["authorization"], Value::Null);
}

#[tokio::test]
async fn post_and_put_send_json_bodies() {
    let t = client_for(&spawn_backend(backend()).await);

    let posted: Value = t.client.post("/echo/body", &json!({ "title": "Rust dev" }), Some("abc")).await.unwrap();
    assert_eq!(posted["body"]["title"], "Rust dev");
    assert_eq!(posted["contentType"], "application/json");

    let put: Value = t.client.put("/echo/body", &json!({ "id": 3 }), None).await.unwrap();
    assert_eq!(put["body"]["id"], 3);
}

#[tokio::test]
async fn delete_sends_bearer() {
    let t = client_for(&spawn_backend(backend()).await);
    let echoed: Value = t.client.delete("/echo/headers", Some("abc")).await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer abc");
}

#[tokio::test]
async fn upload_uses_multipart_boundary_content_type() {
    let t = client_for(&spawn_backend(backend()).await);
    let form = Form::new().text("note", "hello");
    let echoed: Value = t.client.upload_file("/echo/upload", form, Some("abc")).await.unwrap();
    let content_type = echoed["contentType"].as_str().unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="), "got {content_type}");
    assert_eq!(echoed["authorization"], "Bearer abc");
}

#[tokio::test]
async fn query_parameters_are_encoded() {
    let t = client_for(&spawn_backend(backend()).await);
    let echoed: Value = t
        .client
        .send(ApiRequest::get("/echo/query").query("keyword", "rust & go"))
        .await
        .unwrap();
    assert_eq!(echoed["keyword"], "rust & go");
}

// =============================================================================
// ERRORS
// =============================================================================

#[tokio::test]
async fn domain_error_carries_server_message() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = t
        .client
        .post::<Value, _>("/hr/joboffers/publish", &json!({ "title": "" }), Some("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "title required");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn non_json_error_uses_generic_message() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = t.client.get::<Value>("/broken", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Domain { status: 500, ref message } if message == "HTTP error 500"));
}

#[tokio::test]
async fn unknown_endpoint_is_domain_404() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = t.client.get::<Value>("/nope", None).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn no_content_success_decodes_as_null() {
    let t = client_for(&spawn_backend(backend()).await);
    let value: Value = t.client.delete("/empty", Some("abc")).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let t = client_for(&format!("http://{addr}/api"));
    let err = t.client.get::<Value>("/anything", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(t.history.current_path(), "/");
}

// =============================================================================
// 401 HANDLING
// =============================================================================

#[tokio::test]
async fn unauthorized_expires_session_and_redirects_to_login() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(1, Role::Hr, "expired-token"));
    t.history.navigate("/hr");

    let err = t.client.get::<Value>("/hr/interviews", Some("expired-token")).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "Session expired. Please login again.");
    assert!(!t.session.is_authenticated());
    assert_eq!(t.storage.get_item(USER_KEY).unwrap(), None);
    assert_eq!(t.storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(t.history.current_path(), "/login");
}

#[tokio::test]
async fn concurrent_unauthorized_calls_end_in_one_logged_out_state() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(1, Role::Hr, "expired-token"));

    let (a, b) = tokio::join!(
        t.client.get::<Value>("/hr/interviews", Some("expired-token")),
        t.client.get::<Value>("/hr/interviews", Some("expired-token")),
    );

    assert!(matches!(a, Err(ApiError::Unauthorized)));
    assert!(matches!(b, Err(ApiError::Unauthorized)));
    assert!(!t.session.is_authenticated());
    assert_eq!(t.storage.get_item(USER_KEY).unwrap(), None);
    assert_eq!(t.history.current_path(), "/login");
}

#[tokio::test]
async fn valid_token_is_not_intercepted() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(1, Role::Hr, "good"));
    let list: Vec<Value> = t.client.get("/hr/interviews", Some("good")).await.unwrap();
    assert_eq!(list.len(), 1);
    assert!(t.session.is_authenticated());
}

#[tokio::test]
async fn interception_can_be_disabled_per_request() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(1, Role::Candidate, "keep"));

    let err = t
        .client
        .send::<Value>(ApiRequest::post("/auth/login").without_unauthorized_intercept())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Domain { status: 401, ref message } if message == "Bad credentials"));
    assert!(t.session.is_authenticated());
    assert_eq!(t.history.current_path(), "/");
}

// =============================================================================
// CANCELLATION
// =============================================================================

#[tokio::test]
async fn cancelled_call_settles_immediately() {
    let t = client_for(&spawn_backend(backend()).await);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        t.client.send_cancellable::<Value>(ApiRequest::get("/slow"), &cancel),
    )
    .await
    .expect("cancellation should win over the slow response");
    assert!(matches!(result, Err(ApiError::Cancelled)));
}

#[tokio::test]
async fn scope_drop_cancels_in_flight_call() {
    let t = client_for(&spawn_backend(backend()).await);
    let scope = crate::api::RequestScope::new();
    let client = t.client.clone();
    let handle = scope.spawn(async move { client.get::<Value>("/slow", None).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(scope);

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("dropped scope should end the call")
        .expect("task panicked");
    assert!(matches!(result, Err(ApiError::Cancelled)));
}

// =============================================================================
// PLAIN TEXT
// =============================================================================

#[tokio::test]
async fn send_text_returns_raw_body() {
    let t = client_for(&spawn_backend(backend()).await);
    let text = t.client.send_text(ApiRequest::put("/text")).await.expect("text");
    assert_eq!(text, "Interview cancelled");
}

#[tokio::test]
async fn send_rejects_plain_text_as_decode_error() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = t.client.send::<Value>(ApiRequest::put("/text")).await.expect_err("not json");
    assert!(matches!(err, ApiError::Decode(_)));
}
