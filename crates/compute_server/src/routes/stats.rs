//! Descriptive statistics endpoint.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use super::{elapsed_ms, internal_error, run_blocking, AppState};

/// AnalyzeStatistics request. Operation names other than `mean`,
/// `median`, `stddev`, `variance`, `percentiles` are ignored.
#[derive(Debug, Deserialize)]
pub struct StatsAnalysisRequest {
    pub data: Vec<f64>,
    pub operations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsAnalysisResponse {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Rank -> value; populated only when `percentiles` was requested.
    pub percentiles: BTreeMap<u8, f64>,
    pub computation_time_ms: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/stats/analyze", post(analyze_handler))
}

/// POST /api/v1/stats/analyze
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<StatsAnalysisRequest>,
) -> Response {
    let start = Instant::now();
    state.metrics.record_request();

    let engine = state.engine.clone();
    let outcome =
        run_blocking(move || engine.analyze_statistics(&request.data, &request.operations)).await;

    match outcome {
        Ok(stats) => {
            let elapsed = elapsed_ms(start);
            state.metrics.record_latency(elapsed);
            tracing::info!(elapsed_ms = elapsed, "statistical analysis completed");
            Json(StatsAnalysisResponse {
                mean: stats.mean,
                median: stats.median,
                stddev: stats.stddev,
                variance: stats.variance,
                min: stats.min,
                max: stats.max,
                count: stats.count,
                percentiles: stats.percentiles,
                computation_time_ms: elapsed,
            })
            .into_response()
        }
        Err(err) => internal_error("statistical analysis", &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{build_router, test_state};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_analyze(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let router = build_router(test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/stats/analyze")
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
    async fn test_analyze_full_request() {
        let (status, body) = post_analyze(serde_json::json!({
            "data": [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0],
            "operations": ["mean", "median", "stddev", "percentiles"],
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 8);
        assert_eq!(body["mean"], 5.0);
        assert_eq!(body["median"], 4.5);
        assert_eq!(body["variance"], 4.0);
        assert_eq!(body["stddev"], 2.0);
        assert_eq!(body["min"], 2.0);
        assert_eq!(body["max"], 9.0);
        assert_eq!(body["percentiles"]["50"], 4.5);
    }

    #[tokio::test]
    async fn test_analyze_empty_data_is_structured_error() {
        let (status, body) = post_analyze(serde_json::json!({
            "data": [],
            "operations": ["mean"],
        }))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("empty dataset"));
    }
}
