//! Error types for the engine service client

use thiserror::Error;

/// Errors talking to the move-evaluation service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Connection refused, timeout, TLS failure and the like
    #[error("Could not reach the engine service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status; `message` is the service's `error` field when present
    #[error("Engine service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON we expected
    #[error("Could not decode engine service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;
