//! Vector geometry endpoint.

use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use compute_engine::ComputeError;
use serde::{Deserialize, Serialize};

use super::{bad_request, elapsed_ms, internal_error, run_blocking, AppState};

/// VectorOperation request. `operation` is one of `dot_product`,
/// `cross_product`, `norm`, `distance`; `norm` uses `vector_a` only.
#[derive(Debug, Deserialize)]
pub struct VectorOperationRequest {
    pub vector_a: Vec<f64>,
    #[serde(default)]
    pub vector_b: Vec<f64>,
    pub operation: String,
}

/// Exactly one of `result_scalar` / `result_vector` is present,
/// depending on the operation.
#[derive(Debug, Serialize)]
pub struct VectorOperationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_scalar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_vector: Option<Vec<f64>>,
    pub computation_time_ms: f64,
}

enum VectorOutcome {
    Scalar(f64),
    Vector(Vec<f64>),
}

/// The four operations the endpoint accepts.
#[derive(Clone, Copy, Debug)]
enum VectorOp {
    DotProduct,
    CrossProduct,
    Norm,
    Distance,
}

impl std::str::FromStr for VectorOp {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot_product" => Ok(VectorOp::DotProduct),
            "cross_product" => Ok(VectorOp::CrossProduct),
            "norm" => Ok(VectorOp::Norm),
            "distance" => Ok(VectorOp::Distance),
            other => Err(ComputeError::InvalidArgument(format!(
                "unknown vector operation: {other}"
            ))),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/vector", post(vector_handler))
}

/// POST /api/v1/vector
async fn vector_handler(
    State(state): State<AppState>,
    Json(request): Json<VectorOperationRequest>,
) -> Response {
    let start = Instant::now();
    state.metrics.record_request();

    // An unknown operation name is a malformed request, rejected
    // before it reaches the engine.
    let op: VectorOp = match request.operation.parse() {
        Ok(op) => op,
        Err(err) => return bad_request("vector operation", &err),
    };

    let engine = state.engine.clone();
    let outcome = run_blocking(move || {
        let a = &request.vector_a;
        let b = &request.vector_b;
        match op {
            VectorOp::DotProduct => engine.dot_product(a, b).map(VectorOutcome::Scalar),
            VectorOp::CrossProduct => engine.cross_product(a, b).map(VectorOutcome::Vector),
            VectorOp::Norm => engine.vector_norm(a).map(VectorOutcome::Scalar),
            VectorOp::Distance => engine.euclidean_distance(a, b).map(VectorOutcome::Scalar),
        }
    })
    .await;

    match outcome {
        Ok(result) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            let (result_scalar, result_vector) = match result {
                VectorOutcome::Scalar(s) => (Some(s), None),
                VectorOutcome::Vector(v) => (None, Some(v)),
            };
            Json(VectorOperationResponse {
                result_scalar,
                result_vector,
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("vector operation", &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{build_router, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_vector(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let router = build_router(test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/vector")
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
    async fn test_dot_product() {
        let (status, body) = post_vector(serde_json::json!({
            "vector_a": [1.0, 2.0, 3.0],
            "vector_b": [4.0, 5.0, 6.0],
            "operation": "dot_product",
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result_scalar"], 32.0);
        assert!(body.get("result_vector").is_none());
    }

    #[tokio::test]
    async fn test_cross_product_returns_vector() {
        let (status, body) = post_vector(serde_json::json!({
            "vector_a": [1.0, 0.0, 0.0],
            "vector_b": [0.0, 1.0, 0.0],
            "operation": "cross_product",
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result_vector"], serde_json::json!([0.0, 0.0, 1.0]));
        assert!(body.get("result_scalar").is_none());
    }

    #[tokio::test]
    async fn test_norm_ignores_vector_b() {
        let (status, body) = post_vector(serde_json::json!({
            "vector_a": [3.0, 4.0],
            "operation": "norm",
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result_scalar"], 5.0);
    }

    #[tokio::test]
    async fn test_mismatched_lengths_is_structured_error() {
        let (status, body) = post_vector(serde_json::json!({
            "vector_a": [1.0, 2.0],
            "vector_b": [1.0],
            "operation": "distance",
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("dimension mismatch"));
    }

    #[tokio::test]
    async fn test_unknown_operation_is_client_error() {
        let (status, body) = post_vector(serde_json::json!({
            "vector_a": [1.0],
            "vector_b": [1.0],
            "operation": "projection",
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "invalid argument: unknown vector operation: projection"
        );
    }
}
