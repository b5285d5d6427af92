//! Application error type shared by every layer.
//!
//! IPC commands convert these to `String` at the boundary; the form controller
//! logs them and collapses them into a single user-facing message.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Transport-level failure: connection refused, DNS, TLS, broken body.
    #[error("Network error: {0}")]
    Network(String),
    /// The unlock service answered, but not with a success status.
    #[error("API error: {0}")]
    Api(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AppError::Api(format!("status={} {}", status.as_u16(), e)),
            None => AppError::Network(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}
