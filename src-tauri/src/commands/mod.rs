//! Tauri IPC command handlers.
//!
//! Entry point for frontend `invoke()` calls. Handlers parse parameters and
//! forward to the form controller in `services`; they hold no business logic.
//! Errors cross the IPC boundary as `String`.

pub mod files;
pub mod host;
pub mod network;
pub mod settings;
pub mod unlock;

/// Event carrying a `FormSnapshot` after every state change.
pub const FORM_CHANGED_EVENT: &str = "form:changed";
/// Event carrying a `Toast`.
pub const TOAST_EVENT: &str = "toast";
