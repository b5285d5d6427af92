//! Unlock service API abstraction layer.
//!
//! `UnlockApi` is the sole interface for HTTP interactions with the unlock
//! service. Upper layers (`services/`, `commands/`) call through this trait and
//! never construct HTTP requests directly, so a different transport (or a fake
//! in tests) can be swapped in without touching them.

use crate::error::AppError;

/// Relative path of the unlock endpoint.
pub const UPLOAD_PATH: &str = "upload";
/// Relative path of the service's liveness route.
pub const HEALTH_PATH: &str = "health";

/// Multipart payload for one unlock attempt.
pub struct UnlockRequest {
    pub file_name: String,
    pub contents: Vec<u8>,
    pub password: String,
}

impl std::fmt::Debug for UnlockRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockRequest")
            .field("file_name", &self.file_name)
            .field("size", &self.contents.len())
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of the unlock endpoint.
#[derive(Debug, Clone)]
pub struct UnlockResponse {
    /// The unlocked PDF, read as raw bytes.
    pub data: Vec<u8>,
    /// Raw `Content-Disposition` header value, if the server sent one.
    pub content_disposition: Option<String>,
}

/// Abstraction trait for unlock service interactions.
pub trait UnlockApi: Send + Sync {
    /// Post the file and password to the unlock endpoint.
    ///
    /// Any non-success status is an error; the error body is not parsed.
    fn unlock(
        &self,
        request: UnlockRequest,
    ) -> impl std::future::Future<Output = std::result::Result<UnlockResponse, AppError>> + Send;

    /// Whether the service answers its health route. Offline is not an error.
    fn check_health(&self) -> impl std::future::Future<Output = bool> + Send;
}

pub mod v1;
