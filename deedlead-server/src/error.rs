//! API error type
//!
//! Every handler failure becomes a JSON body `{"error": "<message>"}`.
//! Input problems are 400, missing resources 404, everything else 500.
//! Internal causes are logged here and kept out of the response.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500); `message` is returned, `cause` is logged
    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl ApiError {
    /// Wrap an unexpected failure with the message shown to the caller
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Map a library error, keeping input and lookup failures distinct
    pub fn from_common(message: &str, err: deedlead_common::Error) -> Self {
        match err {
            deedlead_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            deedlead_common::Error::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            other => ApiError::internal(message, other),
        }
    }
}

impl From<deedlead_common::Error> for ApiError {
    fn from(err: deedlead_common::Error) -> Self {
        ApiError::from_common("Internal server error", err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal("Internal server error", err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid upload: {}", err.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal { message, cause } => {
                error!("{}: {}", message, cause);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
