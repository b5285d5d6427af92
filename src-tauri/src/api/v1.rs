//! UnlockApiV1: concrete implementation of the UnlockApi trait over reqwest.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use url::Url;

use super::{UnlockApi, UnlockRequest, UnlockResponse, HEALTH_PATH, UPLOAD_PATH};
use crate::error::AppError;
use crate::models::file::PDF_MIME_TYPE;
use crate::models::settings::AppSettings;

const USER_AGENT: &str = concat!("PdfUnlocker/", env!("CARGO_PKG_VERSION"));
const HEALTH_TIMEOUT_SECS: u64 = 5;

pub struct UnlockApiV1 {
    client: reqwest::Client,
    base_url: Url,
}

impl UnlockApiV1 {
    /// Build a client for the service at `server_url`.
    ///
    /// `timeout` of `None` leaves the unlock request unbounded.
    pub fn new(server_url: &str, timeout: Option<Duration>) -> crate::error::Result<Self> {
        let base_url = Self::parse_base_url(server_url)?;
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &AppSettings) -> crate::error::Result<Self> {
        Self::new(
            &settings.server_url,
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the server URL so that relative joins keep any path prefix.
    /// Separated as pub(crate) for unit testing without network.
    pub(crate) fn parse_base_url(server_url: &str) -> crate::error::Result<Url> {
        let trimmed = server_url.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };
        let url = Url::parse(&with_slash)
            .map_err(|e| AppError::Internal(format!("Invalid server URL '{}': {}", server_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AppError::Internal(format!(
                "Unsupported server URL scheme '{}'",
                other
            ))),
        }
    }

    fn endpoint(&self, path: &str) -> crate::error::Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint path '{}': {}", path, e)))
    }
}

impl UnlockApi for UnlockApiV1 {
    async fn unlock(&self, request: UnlockRequest) -> crate::error::Result<UnlockResponse> {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(request.contents)
                    .file_name(request.file_name.clone())
                    .mime_str(PDF_MIME_TYPE)
                    .map_err(|e| AppError::Internal(format!("MIME parse error: {}", e)))?,
            )
            .text("password", request.password);

        let url = self.endpoint(UPLOAD_PATH)?;
        log::info!("Posting '{}' to {}", request.file_name, url);
        let resp = self
            .client
            .post(url)
            .header(ACCEPT, PDF_MIME_TYPE)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let content_disposition = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let data = resp.bytes().await?.to_vec();
        log::debug!(
            "Unlock response: {} bytes, content-disposition={:?}",
            data.len(),
            content_disposition
        );

        Ok(UnlockResponse {
            data,
            content_disposition,
        })
    }

    async fn check_health(&self) -> bool {
        let url = match self.endpoint(HEALTH_PATH) {
            Ok(u) => u,
            Err(_) => return false,
        };
        match self
            .client
            .get(url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}
