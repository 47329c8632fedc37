use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::config::Configuration;

/// Handler serving the configured SVG icon, on both icon paths.
pub async fn handler(
    State(config): State<Arc<Configuration>>,
) -> Result<impl IntoResponse, StatusCode> {
    match tokio::fs::read(&config.favicon).await {
        Ok(icon) => Ok(([(header::CONTENT_TYPE, super::SVG)], icon)),
        Err(err) => {
            tracing::warn!(path = %config.favicon.display(), error = %err, "favicon unavailable");
            Err(StatusCode::NOT_FOUND)
        },
    }
}
