//! Backend Client Errors

use thiserror::Error;

/// Errors that can occur when talking to the analytics backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection refused, DNS failure, body read failure, ...
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend error {status}: {body}")]
    Status {
        status: u16,
        /// `detail` string from the error body, if the backend sent one
        detail: Option<String>,
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Build a status error from a raw error body, extracting `detail`
    pub fn from_status(status: u16, body: String) -> Self {
        let detail = extract_detail(&body);
        BackendError::Status {
            status,
            detail,
            body,
        }
    }

    /// Human-readable message supplied by the backend, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Request(e) => e.status().map(|s| s.as_u16()),
            BackendError::Decode(_) => None,
        }
    }
}

/// Pull a string `detail` out of a JSON error body.
///
/// Validation errors carry a list in `detail`; those are not user-facing
/// and yield `None`.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}
