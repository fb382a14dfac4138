//! Delegation surface for the external inference collaborator.
//!
//! The inference engine is not part of this system; these endpoints
//! forward to an installed [`InferenceBackend`](compute_engine::InferenceBackend)
//! and return 501 Not Implemented when none is configured.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::{elapsed_ms, internal_error, AppState, ErrorResponse};

/// MLInference request: one flat input tensor plus its shape.
#[derive(Debug, Deserialize)]
pub struct InferenceRequest {
    pub input: Vec<f64>,
    pub shape: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct InferenceResponse {
    pub predictions: Vec<f64>,
    pub computation_time_ms: f64,
}

/// MLBatchInference request: several inputs sharing one shape.
#[derive(Debug, Deserialize)]
pub struct BatchInferenceRequest {
    pub inputs: Vec<Vec<f64>>,
    pub shape: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct BatchInferenceResponse {
    pub predictions: Vec<Vec<f64>>,
    pub computation_time_ms: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/ml/predict", post(predict_handler))
        .route("/api/v1/ml/predict/batch", post(predict_batch_handler))
}

fn not_installed() -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ErrorResponse {
            error: "no inference backend installed".to_string(),
        }),
    )
        .into_response()
}

/// POST /api/v1/ml/predict
async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<InferenceRequest>,
) -> Response {
    let Some(backend) = state.inference.clone() else {
        return not_installed();
    };

    let start = Instant::now();
    state.metrics.record_request();

    match backend.predict(&request.input, &request.shape) {
        Ok(predictions) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            Json(InferenceResponse {
                predictions,
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("inference", &err),
    }
}

/// POST /api/v1/ml/predict/batch
async fn predict_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchInferenceRequest>,
) -> Response {
    let Some(backend) = state.inference.clone() else {
        return not_installed();
    };

    let start = Instant::now();
    state.metrics.record_request();

    match backend.predict_batch(&request.inputs, &request.shape) {
        Ok(predictions) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            Json(BatchInferenceResponse {
                predictions,
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("batch inference", &err),
    }
}
