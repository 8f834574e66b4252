//! Remote store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Remote store not connected")]
    NotConnected,

    #[error("Request to {path} timed out")]
    Timeout { path: String },

    #[error("Transport error on {path}: {message}")]
    Transport { path: String, message: String },

    #[error("HTTP {status} from {path}")]
    Status { path: String, status: u16 },

    #[error("Malformed response from {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl StoreError {
    /// Classify a reqwest failure for the given store path.
    pub(crate) fn from_reqwest(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout {
                path: path.to_string(),
            }
        } else if err.is_decode() {
            StoreError::Malformed {
                path: path.to_string(),
                message: err.to_string(),
            }
        } else {
            StoreError::Transport {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True when the store could not be reached at all (as opposed to
    /// answering with something unusable).
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            StoreError::NotConnected
                | StoreError::Timeout { .. }
                | StoreError::Transport { .. }
                | StoreError::Status { .. }
        )
    }

    /// Short label used for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotConnected => "not_connected",
            StoreError::Timeout { .. } => "timeout",
            StoreError::Transport { .. } => "transport",
            StoreError::Status { .. } => "status",
            StoreError::Malformed { .. } => "malformed",
            StoreError::Credential(_) => "credential",
            StoreError::HttpClient(_) => "http_client",
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
