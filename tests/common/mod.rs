#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use cinema_admin::{app, config::Config, AppState};

pub fn config_for(backend_url: &str, failure_threshold: u32) -> Config {
    config_with_timeout(backend_url, failure_threshold, 5)
}

pub fn config_with_timeout(backend_url: &str, failure_threshold: u32, timeout_seconds: u64) -> Config {
    let backend_url = backend_url.to_string();
    let threshold = failure_threshold.to_string();
    let timeout = timeout_seconds.to_string();
    Config::from_lookup(move |key| match key {
        "BACKEND_URL" => Some(backend_url.clone()),
        "CIRCUIT_BREAKER_FAILURE_THRESHOLD" => Some(threshold.clone()),
        "BACKEND_TIMEOUT_SECONDS" => Some(timeout.clone()),
        _ => None,
    })
    .unwrap()
}

pub async fn setup() -> (MockServer, Arc<AppState>, Router) {
    setup_with_timeout(5).await
}

pub async fn setup_with_timeout(timeout_seconds: u64) -> (MockServer, Arc<AppState>, Router) {
    let server = MockServer::start().await;
    let state = AppState::new(config_with_timeout(&server.uri(), 5, timeout_seconds)).unwrap();
    let router = app(state.clone()).unwrap();
    (server, state, router)
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

pub async fn mock_list(server: &MockServer, operation: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/cinema/{operation}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn movies() -> Value {
    json!([
        { "id": 1, "title": "Alien", "gender": "terror", "duration": 117, "classification": "R" },
        { "id": 2, "title": "Coco", "gender": "aventura", "duration": 105, "classification": "G" }
    ])
}

pub fn rooms() -> Value {
    json!([
        { "id": 1, "name": "Sala 1", "capacity": 15 },
        {
            "id": 2,
            "name": "Sala VIP",
            "capacity": 40,
            "tiers": [{ "name": "VIP", "from_row": 3, "to_row": 4 }]
        }
    ])
}

pub fn reservation(id: i64, movie_id: i64, room_id: i64, doc: &str, seats: Value) -> Value {
    json!({
        "id": id,
        "customer_name": format!("Customer {id}"),
        "doc_number": doc,
        "email": format!("c{id}@example.com"),
        "movie_id": movie_id,
        "room_id": room_id,
        "show_time": "2025-03-01T18:30",
        "seats": seats,
        "movie_title": "Alien",
        "room_name": "Sala 1"
    })
}

pub fn details() -> Value {
    json!({
        "email": "ana@example.com",
        "customer_name": "Ana",
        "doc_number": "CC-1",
        "movie_id": 1,
        "show_time": "2025-03-01T18:30"
    })
}
