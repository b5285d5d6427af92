//! Toast delivery seam.

use crate::models::form::{Toast, ToastStatus};

/// Sink for transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Prints toasts to the terminal: errors to stderr, successes to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub(crate) fn render(toast: &Toast) -> String {
        format!("{}: {}", toast.title, toast.description)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        log::debug!("toast status={:?} description={}", toast.status, toast.description);
        match toast.status {
            ToastStatus::Error => eprintln!("{}", Self::render(&toast)),
            ToastStatus::Success => println!("{}", Self::render(&toast)),
        }
    }
}
