//! Matrix multiplication endpoint.

use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use compute_engine::Matrix;
use serde::{Deserialize, Serialize};

use super::{elapsed_ms, internal_error, run_blocking, AppState};

/// MultiplyMatrices request: two row-major buffers plus their shapes.
#[derive(Debug, Deserialize)]
pub struct MatrixMultiplyRequest {
    pub rows_a: usize,
    pub cols_a: usize,
    pub cols_b: usize,
    /// rows_a * cols_a values, row-major.
    pub matrix_a: Vec<f64>,
    /// cols_a * cols_b values, row-major.
    pub matrix_b: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct MatrixMultiplyResponse {
    pub result: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
    pub computation_time_ms: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/matrix/multiply", post(multiply_handler))
}

/// POST /api/v1/matrix/multiply
async fn multiply_handler(
    State(state): State<AppState>,
    Json(request): Json<MatrixMultiplyRequest>,
) -> Response {
    let start = Instant::now();
    state.metrics.record_request();

    let engine = state.engine.clone();
    let outcome = run_blocking(move || {
        let a = Matrix::from_vec(request.rows_a, request.cols_a, request.matrix_a)?;
        let b = Matrix::from_vec(request.cols_a, request.cols_b, request.matrix_b)?;
        engine.multiply_matrices(&a, &b)
    })
    .await;

    match outcome {
        Ok(result) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            tracing::info!(elapsed_ms = elapsed, "matrix multiplication completed");
            Json(MatrixMultiplyResponse {
                rows: result.rows(),
                cols: result.cols(),
                result: result.into_data(),
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("matrix multiplication", &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{build_router, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_multiply(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let router = build_router(test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/matrix/multiply")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_multiply_2x2() {
        let (status, body) = post_multiply(serde_json::json!({
            "rows_a": 2, "cols_a": 2, "cols_b": 2,
            "matrix_a": [1.0, 2.0, 3.0, 4.0],
            "matrix_b": [5.0, 6.0, 7.0, 8.0],
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], 2);
        assert_eq!(body["cols"], 2);
        assert_eq!(
            body["result"],
            serde_json::json!([19.0, 22.0, 43.0, 50.0])
        );
        assert!(body["computation_time_ms"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_multiply_wrong_buffer_length_is_structured_error() {
        let (status, body) = post_multiply(serde_json::json!({
            "rows_a": 2, "cols_a": 2, "cols_b": 2,
            "matrix_a": [1.0, 2.0, 3.0],
            "matrix_b": [5.0, 6.0, 7.0, 8.0],
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("invalid argument"));
    }
}
