use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::airtable::UpstreamError;

/// Request-level failures, mapped onto HTTP responses at the router edge.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("{0}")]
    Submission(String),

    #[error("status store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            ApiError::Upstream(e) => {
                tracing::error!("Upstream failure: {}", e);
                "Failed to fetch content".to_string()
            }
            ApiError::Store(e) => {
                tracing::error!("Status store failure: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Blocking(e) => {
                tracing::error!("Blocking task failure: {}", e);
                "Internal server error".to_string()
            }
            ApiError::ConfigurationMissing(what) => {
                tracing::error!("Configuration missing: {}", what);
                format!("Server configuration error: {} is not set", what)
            }
            other => other.to_string(),
        };
        (self.status(), Json(ErrorBody { detail })).into_response()
    }
}
