use crate::app::AppState;
use crate::callrecord::compute_stats;
use crate::error::IngestError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/webhook", post(receive_webhook).get(webhook_status))
        .route("/api/calls", get(list_calls))
        .route("/api/stats", get(get_stats))
        .route("/api/clear", post(clear_calls))
        .route("/api/seed", post(seed_calls))
}

async fn health() -> Response {
    Json(serde_json::json!({"status": "healthy"})).into_response()
}

async fn webhook_status() -> Response {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Webhook endpoint is active",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Accepts a call-event payload pushed by the voice platform. The body is
/// parsed here rather than via the Json extractor so malformed input maps
/// to the same error shape as validation failures.
async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return error_response(&IngestError::MalformedInput(format!(
                "body is not valid JSON: {}",
                e
            )))
        }
    };

    info!("webhook received, {} bytes", body.len());

    match state.ingest(payload).await {
        Ok(record) => Json(serde_json::json!({
            "status": "success",
            "message": "Webhook received successfully",
            "call_id": record.id,
            "category": record.category,
            "priority": record.priority,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn list_calls(State(state): State<AppState>) -> Response {
    let calls = state.history.snapshot().await;
    Json(serde_json::json!({
        "status": "success",
        "total": calls.len(),
        "calls": calls,
    }))
    .into_response()
}

async fn get_stats(State(state): State<AppState>) -> Response {
    let calls = state.history.snapshot().await;
    Json(compute_stats(&calls)).into_response()
}

async fn clear_calls(State(state): State<AppState>) -> Response {
    let total = state.history.clear().await;
    info!("call history cleared");
    Json(serde_json::json!({"status": "success", "total": total})).into_response()
}

#[derive(Debug, Deserialize)]
struct SeedParams {
    count: Option<usize>,
}

async fn seed_calls(State(state): State<AppState>, body: Bytes) -> Response {
    let count = serde_json::from_slice::<SeedParams>(&body)
        .ok()
        .and_then(|p| p.count)
        .unwrap_or(5);
    let seeded = crate::fixtures::seed_samples(&state, count).await;
    Json(serde_json::json!({
        "status": "success",
        "seeded": seeded,
        "total": state.history.len().await,
    }))
    .into_response()
}

fn error_response(err: &IngestError) -> Response {
    match err {
        IngestError::Internal(msg) => {
            tracing::error!("ingestion failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": "Error processing webhook",
                })),
            )
                .into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "status": "error",
                "message": err.to_string(),
                "errors": err.rules(),
            })),
        )
            .into_response(),
    }
}
