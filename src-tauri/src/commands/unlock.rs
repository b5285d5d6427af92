//! Tauri IPC command handlers for the unlock form.

use std::path::PathBuf;

use tauri::Emitter;

use super::host::{EventNotifier, OpenerViewer};
use super::FORM_CHANGED_EVENT;
use crate::api::v1::UnlockApiV1;
use crate::models::form::FormSnapshot;
use crate::models::settings::AppSettings;
use crate::services::delivery::{Platform, PlatformDelivery};
use crate::services::form_slot::FormSlot;
use crate::services::unlock_form::UnlockForm;
use crate::storage::settings;

pub type AppForm = UnlockForm<UnlockApiV1, PlatformDelivery<OpenerViewer>, EventNotifier>;

/// Tauri managed state for the unlock form.
pub struct UnlockState {
    pub form: FormSlot<AppForm>,
    pub settings_path: PathBuf,
}

impl UnlockState {
    pub fn new(app: tauri::AppHandle, settings_path: PathBuf) -> crate::error::Result<Self> {
        let settings = settings::get_settings(&settings_path)?;
        let form = build_form(&app, &settings)?;
        Ok(Self {
            form: FormSlot::new(form),
            settings_path,
        })
    }

    pub async fn rebuild(&self, app: &tauri::AppHandle, settings: &AppSettings) -> crate::error::Result<()> {
        let form = build_form(app, settings)?;
        let previous = self.form.replace(form).await;
        if previous.snapshot().await.submitting {
            log::info!("Settings changed during a submission; it finishes with the previous settings");
        }
        let snapshot = self.form.current().await.snapshot().await;
        let _ = app.emit(FORM_CHANGED_EVENT, snapshot);
        Ok(())
    }
}

pub fn build_form(app: &tauri::AppHandle, settings: &AppSettings) -> crate::error::Result<AppForm> {
    let api = UnlockApiV1::from_settings(settings)?;
    let platform = Platform::detect(settings.user_agent.as_deref());
    log::info!(
        "Unlock form ready: server={}, platform={:?}",
        api.base_url(),
        platform
    );
    let delivery = PlatformDelivery::new(
        platform,
        settings.resolved_download_dir(),
        OpenerViewer::new(app.clone()),
    )?;
    Ok(UnlockForm::new(api, delivery, EventNotifier::new(app.clone())))
}

#[tauri::command]
pub async fn set_password(
    password: String,
    state: tauri::State<'_, UnlockState>,
) -> Result<FormSnapshot, String> {
    let form = state.form.current().await;
    form.set_password(password).await;
    Ok(form.snapshot().await)
}

#[tauri::command]
pub async fn set_drag_active(
    active: bool,
    app: tauri::AppHandle,
    state: tauri::State<'_, UnlockState>,
) -> Result<FormSnapshot, String> {
    let form = state.form.current().await;
    form.set_drag_active(active).await;
    let snapshot = form.snapshot().await;
    let _ = app.emit(FORM_CHANGED_EVENT, &snapshot);
    Ok(snapshot)
}

/// Runs one submission and returns the settled form.
///
/// While the request is out, a `form:changed` event with the in-flight
/// snapshot lets the web view disable the trigger and show the busy label.
/// The returned snapshot is of the live form, which is a fresh one if
/// settings were saved meanwhile.
#[tauri::command]
pub async fn submit_unlock(
    app: tauri::AppHandle,
    state: tauri::State<'_, UnlockState>,
) -> Result<FormSnapshot, String> {
    let form = state.form.current().await;
    let (outcome, _) = tokio::join!(form.submit(), async {
        // submit() parks on the network before this snapshot is taken
        tokio::task::yield_now().await;
        let _ = app.emit(FORM_CHANGED_EVENT, form.snapshot().await);
    });
    log::debug!("Submit outcome: {:?}", outcome);
    let snapshot = state.form.current().await.snapshot().await;
    let _ = app.emit(FORM_CHANGED_EVENT, &snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn get_form_state(state: tauri::State<'_, UnlockState>) -> Result<FormSnapshot, String> {
    Ok(state.form.current().await.snapshot().await)
}
