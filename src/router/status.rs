//! Instance identification and metrics.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::AppState;
use crate::config::Configuration;

/// Structured configuration.
#[derive(Serialize)]
pub struct Status {
    version: String,
    name: String,
    max_depth: usize,
}

/// Public server status.
pub async fn status(State(config): State<Arc<Configuration>>) -> Json<Status> {
    Json(Status {
        version: config.version().to_owned(),
        name: config.name.clone(),
        max_depth: config.max_depth,
    })
}

/// Prometheus text exposition, when metrics are enabled.
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::router::tests::{body, missing_state};
    use crate::*;

    #[tokio::test]
    async fn test_status_handler() {
        let response = make_request(app(missing_state()), Method::GET, "/status.json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let status: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(status["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(status["name"], "realmtester");
        assert_eq!(status["max_depth"], 32);
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let response = make_request(app(missing_state()), Method::GET, "/metrics").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
