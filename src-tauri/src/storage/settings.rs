use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::settings::AppSettings;

const APP_DIR: &str = "pdf-unlocker";
const STORE_FILE: &str = "settings.json";

/// Default location of the settings file under the OS config directory.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(STORE_FILE)
}

/// Read application settings. Returns defaults if none are saved or the file
/// cannot be parsed.
pub fn get_settings(path: &Path) -> crate::error::Result<AppSettings> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppSettings::default()),
        Err(e) => return Err(AppError::Storage(format!("{}: {}", path.display(), e))),
    };
    let settings = serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
        AppSettings::default()
    });
    Ok(settings)
}

/// Save application settings. Persists to disk immediately.
pub fn save_settings(path: &Path, settings: &AppSettings) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Storage(format!("{}: {}", parent.display(), e)))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).map_err(|e| AppError::Storage(format!("{}: {}", path.display(), e)))?;
    log::info!("Saved settings to {}", path.display());
    Ok(())
}
