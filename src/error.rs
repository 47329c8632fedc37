//! Error handler for realmtester.

use std::path::PathBuf;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::page;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
///
/// Every variant is a data-load failure: missing or optional values never
/// reach this type, they fall back to defaults where they are read.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed YAML data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data file contains no document")]
    EmptyDocument,

    #[error("data file root must be a mapping")]
    NotAMapping,
}

impl ServerError {
    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ServerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Status code sent with the error page.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "post could not be rendered");

        (
            self.status(),
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            page::error_page(&self.to_string()),
        )
            .into_response()
    }
}
