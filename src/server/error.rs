//! Server Error Types
//!
//! Errors raised by the dashboard host, converted to JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::controller::DashboardError;
use crate::theme::ThemeError;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Action rejected by the controller
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    /// Theme preference could not be persisted
    #[error("Failed to save theme: {0}")]
    Theme(#[from] ThemeError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::Dashboard(DashboardError::Busy(_)) => (StatusCode::CONFLICT, "BUSY"),
            ServerError::Dashboard(DashboardError::NothingToExport) => {
                (StatusCode::CONFLICT, "NOTHING_TO_EXPORT")
            }
            ServerError::Theme(_) => (StatusCode::INTERNAL_SERVER_ERROR, "THEME_ERROR"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Dashboard request failed"
        );

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

pub type ServerResult<T> = Result<T, ServerError>;
