//! Axum route handlers for the vessel query server.
//!
//! # Routes
//!
//! - `GET  /health`                  — Returns `{"status": "ok", "version": ...}`
//! - `POST /process`                 — Accepts `{"query": "..."}`, returns a `QueryReply`
//! - `GET  /download?filter=<token>` — Returns the filter's rows as `text/csv`

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::export::{self, EXPORT_FILENAME};
use crate::query::filter::VesselFilter;
use crate::query::formatter::QueryReply;
use crate::query::router::IntentRouter;
use crate::storage::VesselStore;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Record store; each request opens its own session.
    pub store: Arc<dyn VesselStore>,
    /// Intent router built from configuration.
    pub router: Arc<IntentRouter>,
}

impl AppState {
    pub fn new(store: Arc<dyn VesselStore>, router: IntentRouter) -> Self {
        Self {
            store,
            router: Arc::new(router),
        }
    }
}

/// Request body for `POST /process`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub query: String,
}

/// Query string for `GET /download`.
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub filter: String,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/process", post(process_handler))
        .route("/download", get(download_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "maritime-query",
    }))
}

/// POST /process — answer a free-text question.
///
/// The router never fails; store errors come back as an ordinary reply.
/// Store access is synchronous, so it runs on the blocking pool.
async fn process_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<QueryReply>, ApiError> {
    let store = state.store.clone();
    let router = state.router.clone();

    tokio::task::spawn_blocking(move || router.process(store.as_ref(), &request.query))
        .await
        .map(Json)
        .map_err(|join_error| {
            tracing::error!("query processing panicked: {}", join_error);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Query processing panicked: {}", join_error),
            )
        })
}

/// GET /download — CSV export for a filter token from a previous reply.
async fn download_handler(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = VesselFilter::from_token(&params.filter).map_err(|e| {
        tracing::debug!("rejected download token: {}", e);
        api_error(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let store = state.store.clone();
    let csv = tokio::task::spawn_blocking(move || export::export_csv(store.as_ref(), &filter))
        .await
        .map_err(|join_error| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Export panicked: {}", join_error),
            )
        })?
        .map_err(|e| {
            tracing::warn!("export failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}
