use crate::callrecord::{CallRecord, HistoryStore};
use crate::config::Config;
use crate::error::IngestError;
use anyhow::Result;
use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};
use tracing::{debug, info};

pub struct AppStateInner {
    pub config: Arc<Config>,
    pub history: HistoryStore,
    pub token: CancellationToken,
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateBuilder {
    pub config: Option<Config>,
    pub token: Option<CancellationToken>,
}

impl AppStateInner {
    /// Runs the full ingestion pipeline for one inbound webhook payload:
    /// normalize, classify, append. All-or-nothing; on any error the
    /// store is untouched.
    pub async fn ingest(&self, payload: Value) -> Result<CallRecord, IngestError> {
        let record = CallRecord::from_payload(payload)?;
        debug!(
            "ingested call {} category={} priority={}",
            record.id, record.category, record.priority
        );
        self.history.append(record.clone()).await;
        Ok(record)
    }
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            token: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn build(self) -> Result<AppState> {
        let config = Arc::new(self.config.unwrap_or_default());
        let history = HistoryStore::new(config.history_limit);
        Ok(Arc::new(AppStateInner {
            config,
            history,
            token: self.token.unwrap_or_default(),
        }))
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(state: AppState) -> Result<()> {
    let token = state.token.clone();
    let app = create_router(state.clone());
    let addr: SocketAddr = state.config.http_addr.parse()?;
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(anyhow::anyhow!("Failed to bind to {}: {}", addr, e));
        }
    };

    let http_task = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    select! {
        http_result = http_task => {
            match http_result {
                Ok(_) => info!("Server shut down gracefully"),
                Err(e) => {
                    tracing::error!("Server error: {}", e);
                    return Err(anyhow::anyhow!("Server error: {}", e));
                }
            }
        }
        _ = token.cancelled() => {
            info!("Application shutting down due to cancellation");
        }
    }
    token.cancel();
    Ok(())
}

async fn serve_page(static_path: &str, page: &str) -> impl IntoResponse {
    match std::fs::read_to_string(Path::new(static_path).join(page)) {
        Ok(content) => Html(content).into_response(),
        Err(e) => {
            tracing::error!("Failed to read {}: {}", page, e);
            Html("<html><body><h1>Error loading page</h1></body></html>").into_response()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let static_path = state.config.static_path.clone();
    if !Path::new(&static_path).join("index.html").exists() {
        tracing::warn!("{}/index.html does not exist", static_path);
    }
    let static_files_service = ServeDir::new(&static_path);

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            axum::http::header::ORIGIN,
        ]);

    let api_routes = crate::handler::router().with_state(state);
    let index_path = static_path.clone();
    let test_path = static_path.clone();

    Router::new()
        .route(
            "/",
            get(move || async move { serve_page(&index_path, "index.html").await }),
        )
        .route(
            "/test",
            get(move || async move { serve_page(&test_path, "webhook-test.html").await }),
        )
        .nest_service("/static", static_files_service)
        .merge(api_routes)
        .layer(cors)
}
