//! Drop surface command.

use std::path::PathBuf;

use tauri::Emitter;

use super::unlock::UnlockState;
use super::FORM_CHANGED_EVENT;
use crate::models::form::FormSnapshot;

/// Offers dropped or picked paths to the form.
///
/// The web view calls this from its `tauri://drag-drop` listener and from the
/// file-picker dialog. Only the first path is considered by the form; a path
/// that cannot be read is reported as a toast.
#[tauri::command]
pub async fn drop_files(
    paths: Vec<String>,
    app: tauri::AppHandle,
    state: tauri::State<'_, UnlockState>,
) -> Result<FormSnapshot, String> {
    let form = state.form.current().await;
    form.accept_dropped_paths(paths.into_iter().map(PathBuf::from).collect())
        .await;
    let snapshot = form.snapshot().await;
    let _ = app.emit(FORM_CHANGED_EVENT, &snapshot);
    Ok(snapshot)
}
