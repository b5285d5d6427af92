pub mod api;
#[cfg(feature = "gui")]
pub mod commands;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(feature = "gui")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    logging::init(cfg!(debug_assertions));

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let unlock_state = commands::unlock::UnlockState::new(
                app.handle().clone(),
                storage::settings::default_settings_path(),
            )?;
            app.manage(unlock_state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::files::drop_files,
            commands::unlock::set_password,
            commands::unlock::set_drag_active,
            commands::unlock::submit_unlock,
            commands::unlock::get_form_state,
            commands::network::check_server,
            commands::settings::get_settings,
            commands::settings::save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
