//! HTTP error mapping.
//!
//! Every failed request renders as `{ "message": ... }` with the matching
//! status code. Internal failures log their detail and answer with a generic
//! message so nothing leaks to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use daybook_core::rusqlite;
use daybook_core::{AuthError, CoreError, ValidationError};

/// A request-level failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Record absent or owned by another user, 404
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Rejected input, 400
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unusable credential, 401
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Anything the client cannot fix, 500. The detail is logged, not sent.
    #[error("Server error")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => ApiError::NotFound(what),
            CoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CoreError::Auth(AuthError::InvalidToken) => {
                ApiError::Unauthenticated("Invalid or expired token")
            }
            CoreError::Auth(e @ (AuthError::EmailTaken | AuthError::InvalidCredentials)) => {
                ApiError::BadRequest(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, axum::Json(json!({ "message": self.to_string() }))).into_response()
    }
}
