use crate::api::UnlockApi;

use super::unlock::UnlockState;

#[tauri::command]
pub async fn check_server(state: tauri::State<'_, UnlockState>) -> Result<bool, String> {
    let form = state.form.current().await;
    Ok(form.api().check_health().await)
}
