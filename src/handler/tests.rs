use crate::app::{create_router, AppState, AppStateBuilder};
use crate::config::Config;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (AppState, Router) {
    let state = AppStateBuilder::new()
        .config(Config::default())
        .build()
        .unwrap();
    let router = create_router(state.clone());
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn webhook_accepts_valid_payload() {
    let (state, router) = test_app();
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/webhook",
        Some(json!({
            "call_id": "call-1",
            "transcript": "my payment was charged twice",
            "duration": "90",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["call_id"], "call-1");
    assert_eq!(body["category"], "billing");
    assert_eq!(body["priority"], "medium");
    assert_eq!(state.history.len().await, 1);
}

#[tokio::test]
async fn webhook_rejects_invalid_json_body() {
    let (state, router) = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.history.len().await, 0);
}

#[tokio::test]
async fn webhook_rejects_empty_object() {
    let (state, router) = test_app();
    let (status, body) = send(&router, Method::POST, "/api/webhook", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));
    assert_eq!(state.history.len().await, 0);
}

#[tokio::test]
async fn webhook_get_reports_liveness() {
    let (_state, router) = test_app();
    let (status, body) = send(&router, Method::GET, "/api/webhook", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn calls_endpoint_lists_newest_first() {
    let (state, router) = test_app();
    state.ingest(json!({"call_id": "older"})).await.unwrap();
    state.ingest(json!({"call_id": "newer"})).await.unwrap();

    let (status, body) = send(&router, Method::GET, "/api/calls", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    let calls = body["calls"].as_array().unwrap();
    assert_eq!(calls.len(), 2);
    // Server timestamps are monotonic enough here; ties keep arrival order
    // and the later arrival sorts first.
    let ids: Vec<&str> = calls.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"older") && ids.contains(&"newer"));
}

#[tokio::test]
async fn stats_endpoint_aggregates_history() {
    let (state, router) = test_app();
    state
        .ingest(json!({"call_id": "a", "duration": 100, "status": "completed"}))
        .await
        .unwrap();
    state
        .ingest(json!({"call_id": "b", "duration": 200, "status": "completed"}))
        .await
        .unwrap();
    state
        .ingest(json!({"call_id": "c", "duration": 300, "status": "failed"}))
        .await
        .unwrap();

    let (status, body) = send(&router, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["avgDuration"], 200.0);
    assert_eq!(body["successRate"], 66.67);
    assert_eq!(body["urgentCount"], 0);
}

#[tokio::test]
async fn seed_then_clear_resets_everything() {
    let (state, router) = test_app();
    let (status, body) = send(&router, Method::POST, "/api/seed", Some(json!({"count": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seeded"], 6); // 5 random + 1 fixed urgent
    assert_eq!(state.history.len().await, 6);

    let (status, body) = send(&router, Method::POST, "/api/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (_, calls) = send(&router, Method::GET, "/api/calls", None).await;
    assert_eq!(calls["total"], 0);

    let (_, stats) = send(&router, Method::GET, "/api/stats", None).await;
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["avgDuration"], 0.0);
    assert!(stats["categoryCounts"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (_state, router) = test_app();
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
