//! Route modules for the compute server
//!
//! One module per operation family:
//! - matrix: dense matrix multiplication
//! - stats: descriptive statistics analysis
//! - montecarlo: seeded Monte Carlo simulation
//! - vector: vector geometry operations
//! - ml: delegation surface for the external inference collaborator
//! - health: health check and running metrics

pub mod health;
pub mod matrix;
pub mod ml;
pub mod montecarlo;
pub mod stats;
pub mod vector;

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use compute_engine::{ComputeEngine, ComputeError, InferenceBackend};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::metrics::RunningMetrics;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// The compute engine façade (owns the worker pool)
    pub engine: Arc<ComputeEngine>,
    /// Running request metrics, injected at construction
    pub metrics: Arc<RunningMetrics>,
    /// Optional external inference collaborator
    pub inference: Option<Arc<dyn InferenceBackend>>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState; the engine's pool size comes from config.
    pub fn new(config: Arc<ServerConfig>, inference: Option<Arc<dyn InferenceBackend>>) -> Self {
        Self {
            engine: Arc::new(ComputeEngine::new(config.pool_size)),
            metrics: Arc::new(RunningMetrics::new()),
            config,
            inference,
            start_time: Instant::now(),
        }
    }
}

/// Structured failure payload carried by every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Converts a request rejected before it reaches the engine into a
/// structured client-error response.
pub(crate) fn bad_request(context: &str, err: &ComputeError) -> Response {
    tracing::warn!(error = %err, "{} rejected", context);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Converts a kernel failure caught at the handler boundary into a
/// structured internal-error response; the server stays available.
pub(crate) fn internal_error(context: &str, err: &ComputeError) -> Response {
    tracing::error!(error = %err, "{} failed", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Runs a CPU-bound kernel call off the async runtime.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, ComputeError>
where
    F: FnOnce() -> Result<T, ComputeError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        Err(join) => Err(ComputeError::Internal(join.to_string())),
    }
}

/// Elapsed wall-clock milliseconds since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Build the main application router by merging all route modules
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(matrix::routes())
        .merge(stats::routes())
        .merge(montecarlo::routes())
        .merge(vector::routes())
        .merge(ml::routes())
        .with_state(state)
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    AppState::new(Arc::new(ServerConfig::default()), None)
}
