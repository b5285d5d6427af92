use super::unlock::UnlockState;
use crate::models::settings::AppSettings;
use crate::storage::settings;

#[tauri::command]
pub fn get_settings(state: tauri::State<'_, UnlockState>) -> Result<AppSettings, String> {
    settings::get_settings(&state.settings_path).map_err(|e| e.to_string())
}

/// Persists settings and rebuilds the form so they apply immediately.
///
/// The rebuilt form starts empty. A submission already in flight settles on
/// the previous form.
#[tauri::command]
pub async fn save_settings(
    settings_data: AppSettings,
    app: tauri::AppHandle,
    state: tauri::State<'_, UnlockState>,
) -> Result<(), String> {
    settings::save_settings(&state.settings_path, &settings_data).map_err(|e| e.to_string())?;
    state
        .rebuild(&app, &settings_data)
        .await
        .map_err(|e| e.to_string())
}
