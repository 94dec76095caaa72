//! HTTP error responses.

use crate::core::ClassifyError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by request handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing a required part or is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The remote image could not be fetched.
    #[error("failed to fetch image: {0}")]
    Fetch(String),

    /// The classifier rejected the request or failed.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Classification did not finish before the request deadline.
    #[error("classification did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    /// The blocking classification task could not be joined.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Fetch(_) => StatusCode::BAD_REQUEST,
            Self::Classify(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Classify(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
