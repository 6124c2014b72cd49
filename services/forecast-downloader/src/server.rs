//! HTTP server for job submission, health and download status.
//!
//! Provides endpoints for:
//! - `POST /forecast` - Submit a forecast download job
//! - `GET /health` - Health check
//! - `GET /status` - Files downloaded so far
//! - `GET /metrics` - Prometheus metrics

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use forecast_common::ForecastError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::dispatch::{ForecastJobRequest, JobDispatcher};
use crate::status::{self, StatusReport};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub data_directory: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned from a handler, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub ForecastError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        ApiError(err)
    }
}

// ============================================================================
// Shared State
// ============================================================================

pub struct ServerState {
    pub dispatcher: JobDispatcher,
    pub data_dir: PathBuf,
    pub metrics: PrometheusHandle,
}

impl ServerState {
    pub fn new(dispatcher: JobDispatcher, metrics: PrometheusHandle) -> Self {
        let data_dir = dispatcher.processor().layout().root().to_path_buf();
        Self {
            dispatcher,
            data_dir,
            metrics,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the HTTP router.
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/forecast", post(forecast_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /forecast - Validate a job and start it in the background
async fn forecast_handler(
    Extension(state): Extension<Arc<ServerState>>,
    payload: Result<Json<ForecastJobRequest>, JsonRejection>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        error!(error = %rejection.body_text(), "Unreadable forecast request body");
        ApiError(ForecastError::invalid_body(rejection.body_text()))
    })?;

    if let Err(e) = state.dispatcher.dispatch(request) {
        if !e.is_validation() {
            error!(error = %e, "Error in /forecast endpoint before starting background job");
        }
        return Err(e.into());
    }

    Ok(Json(DispatchResponse {
        success: true,
        message: "Forecast download initiated in background.".to_string(),
    }))
}

/// GET /health - Health check
async fn health_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        data_directory: state.data_dir.display().to_string(),
    })
}

/// GET /status - Files downloaded so far
async fn status_handler(
    Extension(state): Extension<Arc<ServerState>>,
) -> Result<Json<StatusReport>, ApiError> {
    let files = status::list_downloaded(&state.data_dir).await.map_err(|e| {
        error!(error = %e, "Failed to list downloaded files");
        ApiError(e)
    })?;
    Ok(Json(StatusReport::new(&state.data_dir, files)))
}

/// GET /metrics - Prometheus metrics
async fn metrics_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    state.metrics.render()
}

/// Start the HTTP server and run until `shutdown` resolves.
pub async fn run_server(
    state: Arc<ServerState>,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(address = %addr, "Starting forecast downloader HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
