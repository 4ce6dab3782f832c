//! HTTP-layer error type.
//!
//! Validation problems carry their field-specific message to the client as
//! HTTP 400; everything else is logged and answered with a generic 500 —
//! never the raw error text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Generic client-facing message for unexpected failures.
const INTERNAL_ERROR_MESSAGE: &str =
    "An error occurred while processing your message. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty required request field.
    #[error("{0}")]
    BadRequest(String),
    /// Unexpected failure during request handling.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(e) => {
                error!(error = %e, "Unhandled error in request handler");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                timestamp: Utc::now(),
            }),
        )
            .into_response()
    }
}
