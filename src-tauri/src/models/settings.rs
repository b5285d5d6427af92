use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Application-level settings persisted to settings.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Base URL of the unlock service; `/upload` and `/health` are resolved against it.
    pub server_url: String,
    /// Where desktop downloads land. `None` means the OS download directory.
    pub download_dir: Option<PathBuf>,
    /// Overrides the build-target platform check when set.
    pub user_agent: Option<String>,
    /// No timeout is applied to the unlock request unless set.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            download_dir: None,
            user_agent: None,
            request_timeout_secs: None,
        }
    }
}

impl AppSettings {
    /// Download directory with the fallback chain applied.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
