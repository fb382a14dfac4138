//! Health check endpoint.
//!
//! Reports uptime since start, the cumulative request count, and the
//! running average response time. Health probes themselves do not count
//! toward the request totals.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::AppState;

/// HealthCheck response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Health status ("healthy")
    pub status: String,
    /// Seconds since the server started
    pub uptime_seconds: f64,
    /// Requests dispatched since start (health checks excluded)
    pub total_requests: u64,
    /// Running average response time of completed calls
    pub avg_response_time_ms: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        total_requests: state.metrics.total_requests(),
        avg_response_time_ms: state.metrics.average_response_time_ms(),
    };

    (StatusCode::OK, Json(response))
}
