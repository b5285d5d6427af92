//! Web-view implementations of the controller's notification and viewer seams.

use tauri::Emitter;
use tauri_plugin_opener::OpenerExt;
use url::Url;

use super::TOAST_EVENT;
use crate::error::AppError;
use crate::models::form::Toast;
use crate::services::delivery::Viewer;
use crate::services::notifier::Notifier;

/// Forwards toasts to the web view, which renders and expires them.
pub struct EventNotifier {
    app: tauri::AppHandle,
}

impl EventNotifier {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, toast: Toast) {
        if let Err(e) = self.app.emit(TOAST_EVENT, toast) {
            log::error!("Failed to emit toast: {}", e);
        }
    }
}

/// Opens object URLs through the opener plugin.
pub struct OpenerViewer {
    app: tauri::AppHandle,
}

impl OpenerViewer {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl Viewer for OpenerViewer {
    fn open(&self, url: &Url) -> crate::error::Result<()> {
        self.app
            .opener()
            .open_url(url.as_str(), None::<&str>)
            .map_err(|e| AppError::Io(format!("Failed to open {}: {}", url, e)))
    }
}
