//! Presentation models shared by the form controller and its front ends.

use serde::{Deserialize, Serialize};

/// How long a toast stays on screen before it expires on its own.
pub const TOAST_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastStatus {
    Success,
    Error,
}

/// A transient, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub status: ToastStatus,
    pub duration_ms: u64,
    pub is_closable: bool,
}

impl Toast {
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            status: ToastStatus::Error,
            duration_ms: TOAST_DURATION_MS,
            is_closable: true,
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            status: ToastStatus::Success,
            duration_ms: TOAST_DURATION_MS,
            is_closable: true,
        }
    }
}

/// Read-only projection of the form, sent to the web view after every change.
///
/// The password itself never leaves the controller; only its presence does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub selected_file_name: Option<String>,
    pub has_password: bool,
    pub submitting: bool,
    pub can_submit: bool,
    pub drop_zone_text: String,
    pub button_label: String,
}
