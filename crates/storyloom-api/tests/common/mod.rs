//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storyloom_scenario::memory::InMemoryScenarioRepository;
use storyloom_store::memory_event_repository::InMemoryEventRepository;
use storyloom_test_support::{FixedClock, fixed_now};
use tower::ServiceExt;
use uuid::Uuid;

use storyloom_api::routes;
use storyloom_api::state::AppState;

/// Fresh state with a fixed clock and empty in-memory stores.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(FixedClock(fixed_now())),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(InMemoryScenarioRepository::new()),
    )
}

/// Build the full app router over `state`. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app(state: &AppState) -> Router {
    routes::app(state.clone())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, body_bytes.to_vec())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Send a POST request with a raw text body and return the JSON response.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.to_owned()))
        .unwrap();

    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Send a GET request and return the JSON response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, text) = get_text(app, uri).await;
    (status, serde_json::from_str(&text).unwrap())
}

/// Send a GET request and return the body as text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(app, request).await;
    (status, String::from_utf8(bytes).unwrap())
}

/// Import `source` and return the new scenario's id.
pub async fn import(state: &AppState, source: &str) -> Uuid {
    let (status, json) =
        post_raw(build_test_app(state), "/api/v1/scenarios/import", source).await;
    assert_eq!(status, StatusCode::CREATED, "import failed: {json}");
    json["scenario_id"].as_str().unwrap().parse().unwrap()
}

/// Start playing `scenario_id` and return the session id.
pub async fn start(state: &AppState, scenario_id: Uuid) -> Uuid {
    let (status, json) = post_json(
        build_test_app(state),
        "/api/v1/playback/start",
        &serde_json::json!({ "scenario_id": scenario_id, "player_name": "Ada" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "start failed: {json}");
    json["session_id"].as_str().unwrap().parse().unwrap()
}

/// Pick choice `index` in `session_id`.
pub async fn choose(
    state: &AppState,
    session_id: Uuid,
    index: usize,
) -> (StatusCode, serde_json::Value) {
    post_json(
        build_test_app(state),
        "/api/v1/playback/choose",
        &serde_json::json!({ "session_id": session_id, "choice_index": index }),
    )
    .await
}
