//! API error types
//!
//! Every error body is `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kameo::error::SendError;
use netventory_api::ErrorResponse;
use netventory_core::CoreError;
use tracing::error;

/// Error response with its status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: ErrorResponse,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorResponse {
                error: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::SourceError(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidRule { .. } | CoreError::TaskFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl<M> From<SendError<M, CoreError>> for AppError {
    fn from(err: SendError<M, CoreError>) -> Self {
        match err {
            SendError::HandlerError(e) => e.into(),
            other => {
                error!(error = %other, "inventory actor unavailable");
                Self::internal(format!("inventory actor unavailable: {other}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
