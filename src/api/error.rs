//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::metric::UnknownMetric;
use crate::pagination::PaginationError;
use crate::range::RangeError;
use crate::source::SourceError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Date bounds rejected
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Page size rejected
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Data source error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UnknownMetric> for ApiError {
    fn from(err: UnknownMetric) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Range(RangeError::InvalidRange(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANGE")
            }
            ApiError::Range(RangeError::RangeTooLarge { .. }) => {
                (StatusCode::BAD_REQUEST, "RANGE_TOO_LARGE")
            }
            ApiError::Pagination(PaginationError::InvalidLimit(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_LIMIT")
            }
            ApiError::Source(SourceError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Source(SourceError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Source(SourceError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SOURCE_ERROR")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_errors_are_bad_requests() {
        let err: ApiError = RangeError::InvalidRange("from is after to".into()).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_RANGE")
        );
        assert_eq!(err.to_string(), "Invalid range: from is after to");

        let err: ApiError = RangeError::RangeTooLarge { span: 32, max: 31 }.into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "RANGE_TOO_LARGE")
        );
    }

    #[test]
    fn test_pagination_and_source_mapping() {
        let err: ApiError = PaginationError::InvalidLimit(0).into();
        assert_eq!(err.status_and_code().1, "INVALID_LIMIT");

        let err: ApiError = SourceError::Conflict("tag exists".into()).into();
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);

        let err: ApiError = SourceError::Unavailable("down".into()).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "SOURCE_ERROR")
        );
    }

    #[test]
    fn test_unknown_metric_is_not_found() {
        let err: ApiError = UnknownMetric("steps".into()).into();
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "NOT_FOUND"));
    }
}
