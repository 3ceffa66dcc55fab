// ABOUTME: Errors from the resource-management API, the token endpoint and zip deploy.
// ABOUTME: HTTP 401/403 from any call is normalized to Authentication.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ArmError {
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("{operation} rejected with status {status} ({code}): {message}")]
    Rejected {
        operation: String,
        status: u16,
        code: String,
        message: String,
    },

    #[error("{operation} finished with status {status}: {message}")]
    OperationFailed {
        operation: String,
        status: String,
        message: String,
    },

    #[error("{operation} did not complete within {elapsed:?}")]
    OperationTimedOut { operation: String, elapsed: Duration },

    #[error("zip deploy to {site} failed with status {status}: {body}")]
    Upload {
        site: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response to {operation}: {message}")]
    Decode { operation: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ArmError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::Rejected { status: 404, .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ArmError::Authentication { .. })
    }
}
