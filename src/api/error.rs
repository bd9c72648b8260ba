//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::BadRequest(detail) => ("BAD_REQUEST", detail),
            ApiError::MissingFields(detail) => ("MISSING_FIELDS", detail),
            ApiError::Conflict(detail) => ("CONFLICT", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                ("INTERNAL", "An internal error occurred".to_string())
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingPitchFields => ApiError::MissingFields(err.to_string()),
            CoreError::PitchAlreadyShown => ApiError::Conflict(err.to_string()),
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Export(e) => ApiError::Internal(e.to_string()),
            CoreError::Task(e) => ApiError::Internal(e),
        }
    }
}
