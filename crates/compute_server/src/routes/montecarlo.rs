//! Monte Carlo simulation endpoint.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::{elapsed_ms, internal_error, run_blocking, AppState};

/// RunMonteCarlo request. `simulation_type` is one of `pi_estimation`,
/// `option_pricing`, `integration`.
#[derive(Debug, Deserialize)]
pub struct MonteCarloRequest {
    pub iterations: usize,
    pub dimensions: usize,
    pub seed: u64,
    pub simulation_type: String,
}

#[derive(Debug, Serialize)]
pub struct MonteCarloResponse {
    pub result: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub iterations_completed: usize,
    /// Variant-specific auxiliary metrics.
    pub additional_metrics: BTreeMap<String, f64>,
    pub computation_time_ms: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/montecarlo/run", post(run_handler))
}

/// POST /api/v1/montecarlo/run
async fn run_handler(
    State(state): State<AppState>,
    Json(request): Json<MonteCarloRequest>,
) -> Response {
    let start = Instant::now();
    state.metrics.record_request();

    tracing::info!(
        simulation_type = %request.simulation_type,
        iterations = request.iterations,
        seed = request.seed,
        "running Monte Carlo simulation"
    );

    let engine = state.engine.clone();
    let outcome = run_blocking(move || {
        engine.run_monte_carlo(
            request.iterations,
            request.dimensions,
            request.seed,
            &request.simulation_type,
        )
    })
    .await;

    match outcome {
        Ok(result) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            tracing::info!(elapsed_ms = elapsed, "Monte Carlo simulation completed");
            Json(MonteCarloResponse {
                result: result.result,
                confidence_interval_lower: result.confidence_lower,
                confidence_interval_upper: result.confidence_upper,
                iterations_completed: result.iterations_completed,
                additional_metrics: result.additional_metrics,
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("Monte Carlo simulation", &err),
    }
}
