//! Upload form controller: owns the selected file, the password and the
//! in-flight flag, and runs the single unlock request.
//!
//! The state lock is never held across the network await, so the in-flight
//! flag is observable (and a second submit is refused) while a request runs.

use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::api::{UnlockApi, UnlockRequest};
use crate::error::AppError;
use crate::models::file::SelectedFile;
use crate::models::form::{FormSnapshot, Toast};
use crate::services::delivery::{DeliveredArtifact, Delivery};
use crate::services::dropped_files;
use crate::services::notifier::Notifier;

pub const MSG_NOT_PDF: &str = "Please upload a PDF file";
pub const MSG_NO_FILE: &str = "Please select a PDF file";
pub const MSG_NO_PASSWORD: &str = "Please enter the password";
pub const MSG_UNLOCKED: &str = "PDF unlocked successfully!";
pub const MSG_UNLOCK_FAILED: &str =
    "Failed to unlock PDF. Please check the password and try again.";

const PROMPT_IDLE: &str = "Drag and drop a PDF file here, or click to select";
const PROMPT_DRAG_ACTIVE: &str = "Drop the PDF here";
const LABEL_IDLE: &str = "Unlock PDF";
const LABEL_SUBMITTING: &str = "Unlocking...";

#[derive(Debug, Default)]
struct FormState {
    selected_file: Option<SelectedFile>,
    password: String,
    submitting: bool,
    drag_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingFile,
    MissingPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Unlocked {
        file_name: String,
        artifact: DeliveredArtifact,
    },
    /// A precondition failed; nothing was sent.
    Rejected(RejectReason),
    /// Another submission is still in flight; nothing was sent.
    Busy,
    /// The request or the delivery failed; the form keeps its inputs.
    Failed,
}

/// Output file name for an unlocked document.
///
/// Uses the `filename=` parameter of a `Content-Disposition` value when there
/// is one, with surrounding quotes stripped and any directory part dropped.
/// Falls back to `unlocked_<original>`.
pub fn resolve_file_name(content_disposition: Option<&str>, original_name: &str) -> String {
    let fallback = || format!("unlocked_{}", original_name);

    let Some(header) = content_disposition else {
        return fallback();
    };
    // Only a whole `filename` parameter counts, not a suffix of another name.
    let Some(idx) = header.match_indices("filename=").map(|(i, _)| i).find(|&i| {
        let before = header[..i].trim_end();
        before.is_empty() || before.ends_with(';')
    }) else {
        return fallback();
    };
    let raw = header[idx + "filename=".len()..].trim_start();
    let value = match raw.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => raw.split(';').next().unwrap_or_default(),
    };
    let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
    let base = value.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default().trim();

    if base.is_empty() || base == "." || base == ".." {
        fallback()
    } else {
        base.to_string()
    }
}

pub struct UnlockForm<A, D, N> {
    api: A,
    delivery: D,
    notifier: N,
    state: Mutex<FormState>,
}

impl<A, D, N> UnlockForm<A, D, N>
where
    A: UnlockApi,
    D: Delivery,
    N: Notifier,
{
    pub fn new(api: A, delivery: D, notifier: N) -> Self {
        Self {
            api,
            delivery,
            notifier,
            state: Mutex::new(FormState::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Offer a drop/pick batch to the form. Only the first file counts.
    ///
    /// A non-PDF first file raises an error toast and leaves the current
    /// selection alone.
    pub async fn accept_dropped_files(&self, files: Vec<SelectedFile>) {
        let Some(file) = files.into_iter().next() else {
            return;
        };
        if !file.is_pdf() {
            log::info!(
                "Rejected dropped file '{}' with type '{}'",
                file.name,
                file.mime_type
            );
            self.notifier.notify(Toast::error(MSG_NOT_PDF));
            return;
        }
        log::info!("Selected '{}' ({} bytes)", file.name, file.contents.len());
        self.state.lock().await.selected_file = Some(file);
    }

    /// Offer dropped or picked filesystem paths. Only the first path is read.
    ///
    /// A drop ends the drag whether or not the path can be read; an unreadable
    /// path raises an error toast and leaves the selection alone.
    pub async fn accept_dropped_paths(&self, paths: Vec<PathBuf>) {
        self.set_drag_active(false).await;
        let first: Vec<PathBuf> = paths.into_iter().take(1).collect();
        match dropped_files::resolve_dropped_paths(first).await {
            Ok(files) => self.accept_dropped_files(files).await,
            Err(e) => {
                log::warn!("Failed to read dropped path: {}", e);
                self.notifier.notify(Toast::error(e.to_string()));
            }
        }
    }

    pub async fn set_password(&self, password: impl Into<String>) {
        self.state.lock().await.password = password.into();
    }

    pub async fn set_drag_active(&self, active: bool) {
        self.state.lock().await.drag_active = active;
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.lock().await;
        let selected_file_name = state.selected_file.as_ref().map(|f| f.name.clone());
        let drop_zone_text = match (&selected_file_name, state.drag_active) {
            (Some(name), _) => format!("Selected file: {}", name),
            (None, true) => PROMPT_DRAG_ACTIVE.to_string(),
            (None, false) => PROMPT_IDLE.to_string(),
        };
        let button_label = if state.submitting {
            LABEL_SUBMITTING
        } else {
            LABEL_IDLE
        };
        FormSnapshot {
            selected_file_name,
            has_password: !state.password.is_empty(),
            submitting: state.submitting,
            can_submit: !state.submitting,
            drop_zone_text,
            button_label: button_label.to_string(),
        }
    }

    /// Validate, post, deliver.
    ///
    /// Every attempt that gets past validation clears the in-flight flag
    /// exactly once before returning.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut state = self.state.lock().await;
            if state.submitting {
                log::warn!("Submit ignored: a submission is already in flight");
                return SubmitOutcome::Busy;
            }
            let Some(file) = state.selected_file.as_ref() else {
                self.notifier.notify(Toast::error(MSG_NO_FILE));
                return SubmitOutcome::Rejected(RejectReason::MissingFile);
            };
            if state.password.is_empty() {
                self.notifier.notify(Toast::error(MSG_NO_PASSWORD));
                return SubmitOutcome::Rejected(RejectReason::MissingPassword);
            }
            let request = UnlockRequest {
                file_name: file.name.clone(),
                contents: file.contents.clone(),
                password: state.password.clone(),
            };
            state.submitting = true;
            request
        };

        let original_name = request.file_name.clone();
        let result = self.unlock_and_deliver(request).await;

        let mut state = self.state.lock().await;
        let outcome = match result {
            Ok((file_name, artifact)) => {
                log::info!("Unlocked '{}' as '{}'", original_name, file_name);
                self.notifier.notify(Toast::success(MSG_UNLOCKED));
                state.selected_file = None;
                state.password.clear();
                SubmitOutcome::Unlocked {
                    file_name,
                    artifact,
                }
            }
            Err(e) => {
                log::error!("Failed to unlock '{}': {}", original_name, e);
                self.notifier.notify(Toast::error(MSG_UNLOCK_FAILED));
                SubmitOutcome::Failed
            }
        };
        state.submitting = false;
        outcome
    }

    async fn unlock_and_deliver(
        &self,
        request: UnlockRequest,
    ) -> Result<(String, DeliveredArtifact), AppError> {
        let original_name = request.file_name.clone();
        let response = self.api.unlock(request).await?;
        let file_name = resolve_file_name(response.content_disposition.as_deref(), &original_name);
        let artifact = self.delivery.deliver(response.data, file_name.clone()).await?;
        Ok((file_name, artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UnlockResponse;
    use crate::models::file::PDF_MIME_TYPE;
    use crate::models::form::ToastStatus;
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Notify;

    #[derive(Clone)]
    enum Reply {
        Ok(Option<String>),
        Status(u16),
        Network,
    }

    struct FakeApi {
        reply: Reply,
        calls: StdMutex<Vec<(String, Vec<u8>, String)>>,
        gate: Option<(Notify, Notify)>,
    }

    impl FakeApi {
        fn replying(reply: Reply) -> Self {
            Self {
                reply,
                calls: StdMutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(reply: Reply) -> Self {
            Self {
                gate: Some((Notify::new(), Notify::new())),
                ..Self::replying(reply)
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl UnlockApi for FakeApi {
        async fn unlock(&self, request: UnlockRequest) -> crate::error::Result<UnlockResponse> {
            self.calls.lock().unwrap().push((
                request.file_name,
                request.contents,
                request.password,
            ));
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            match self.reply.clone() {
                Reply::Ok(content_disposition) => Ok(UnlockResponse {
                    data: b"%PDF-unlocked".to_vec(),
                    content_disposition,
                }),
                Reply::Status(code) => Err(AppError::Api(format!("status={}", code))),
                Reply::Network => Err(AppError::Network("connection refused".into())),
            }
        }

        async fn check_health(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct RecordingDelivery {
        delivered: StdMutex<Vec<(Vec<u8>, String)>>,
        fail: bool,
    }

    impl Delivery for RecordingDelivery {
        async fn deliver(
            &self,
            data: Vec<u8>,
            file_name: String,
        ) -> crate::error::Result<DeliveredArtifact> {
            if self.fail {
                return Err(AppError::Io("disk full".into()));
            }
            self.delivered.lock().unwrap().push((data, file_name.clone()));
            Ok(DeliveredArtifact::Downloaded {
                path: PathBuf::from(file_name),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        toasts: StdMutex<Vec<Toast>>,
    }

    impl RecordingNotifier {
        fn descriptions(&self) -> Vec<String> {
            self.toasts
                .lock()
                .unwrap()
                .iter()
                .map(|t| t.description.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    type TestForm = UnlockForm<FakeApi, RecordingDelivery, RecordingNotifier>;

    fn form_with(reply: Reply) -> TestForm {
        UnlockForm::new(
            FakeApi::replying(reply),
            RecordingDelivery::default(),
            RecordingNotifier::default(),
        )
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, PDF_MIME_TYPE, format!("contents of {}", name).into_bytes())
    }

    async fn ready_form(reply: Reply) -> TestForm {
        let form = form_with(reply);
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        form.set_password("secret").await;
        form
    }

    // --- resolve_file_name ---

    #[test]
    fn test_resolve_file_name_from_quoted_header() {
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="clean.pdf""#), "doc.pdf"),
            "clean.pdf"
        );
    }

    #[test]
    fn test_resolve_file_name_unquoted_stops_at_semicolon() {
        assert_eq!(
            resolve_file_name(Some("attachment; filename=clean.pdf; size=10"), "doc.pdf"),
            "clean.pdf"
        );
    }

    #[test]
    fn test_resolve_file_name_without_header_or_parameter() {
        assert_eq!(resolve_file_name(None, "doc.pdf"), "unlocked_doc.pdf");
        assert_eq!(resolve_file_name(Some("inline"), "doc.pdf"), "unlocked_doc.pdf");
        assert_eq!(
            resolve_file_name(Some("attachment; filename*=utf-8''%C3%A9.pdf"), "doc.pdf"),
            "unlocked_doc.pdf"
        );
    }

    #[test]
    fn test_resolve_file_name_matches_whole_parameter_only() {
        assert_eq!(
            resolve_file_name(Some("attachment; xfilename=a.pdf"), "doc.pdf"),
            "unlocked_doc.pdf"
        );
        assert_eq!(
            resolve_file_name(Some(r#"attachment; xfilename=a.pdf; filename="b.pdf""#), "doc.pdf"),
            "b.pdf"
        );
        assert_eq!(resolve_file_name(Some("filename=c.pdf"), "doc.pdf"), "c.pdf");
        assert_eq!(
            resolve_file_name(Some("attachment;filename=d.pdf"), "doc.pdf"),
            "d.pdf"
        );
    }

    #[test]
    fn test_resolve_file_name_drops_directories() {
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="../../etc/clean.pdf""#), "doc.pdf"),
            "clean.pdf"
        );
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="C:\temp\clean.pdf""#), "doc.pdf"),
            "clean.pdf"
        );
        assert_eq!(
            resolve_file_name(Some(r#"attachment; filename="""#), "doc.pdf"),
            "unlocked_doc.pdf"
        );
        assert_eq!(
            resolve_file_name(Some("attachment; filename=.."), "doc.pdf"),
            "unlocked_doc.pdf"
        );
    }

    // --- accept_dropped_files ---

    #[tokio::test]
    async fn test_drop_pdf_selects_it() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;

        let snap = form.snapshot().await;
        assert_eq!(snap.selected_file_name.as_deref(), Some("doc.pdf"));
        assert_eq!(snap.drop_zone_text, "Selected file: doc.pdf");
        assert!(form.notifier().descriptions().is_empty());
    }

    #[tokio::test]
    async fn test_drop_non_pdf_keeps_previous_selection() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        form.accept_dropped_files(vec![SelectedFile::new("cat.png", "image/png", vec![1])])
            .await;
        form.accept_dropped_files(vec![SelectedFile::new("notes", "", vec![2])])
            .await;

        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("doc.pdf")
        );
        let toasts = form.notifier().toasts.lock().unwrap().clone();
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| t.description == MSG_NOT_PDF));
        assert!(toasts.iter().all(|t| t.status == ToastStatus::Error));
    }

    #[tokio::test]
    async fn test_drop_non_pdf_on_empty_form_selects_nothing() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![SelectedFile::new("a.docx", "application/msword", vec![])])
            .await;
        assert!(form.snapshot().await.selected_file_name.is_none());
        assert_eq!(form.notifier().descriptions(), vec![MSG_NOT_PDF]);
    }

    #[tokio::test]
    async fn test_drop_only_first_file_counts() {
        let form = form_with(Reply::Ok(None));
        // A PDF behind a non-PDF does not rescue the batch.
        form.accept_dropped_files(vec![
            SelectedFile::new("a.txt", "text/plain", vec![]),
            pdf("b.pdf"),
        ])
        .await;
        assert!(form.snapshot().await.selected_file_name.is_none());

        form.accept_dropped_files(vec![pdf("first.pdf"), pdf("second.pdf")])
            .await;
        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("first.pdf")
        );
    }

    #[tokio::test]
    async fn test_drop_last_pdf_wins() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("one.pdf")]).await;
        form.accept_dropped_files(vec![pdf("two.pdf")]).await;
        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("two.pdf")
        );
    }

    #[tokio::test]
    async fn test_drop_empty_batch_is_noop() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        form.accept_dropped_files(vec![]).await;
        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("doc.pdf")
        );
        assert!(form.notifier().descriptions().is_empty());
    }

    // --- accept_dropped_paths ---

    #[tokio::test]
    async fn test_drop_path_reads_first_file_and_ends_drag() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("doc.pdf");
        let second = dir.path().join("other.pdf");
        std::fs::write(&first, b"%PDF-1.7").unwrap();
        std::fs::write(&second, b"%PDF-1.7").unwrap();

        let form = form_with(Reply::Ok(None));
        form.set_drag_active(true).await;
        form.accept_dropped_paths(vec![first, second]).await;

        let snap = form.snapshot().await;
        assert_eq!(snap.selected_file_name.as_deref(), Some("doc.pdf"));
        assert!(form.notifier().descriptions().is_empty());
    }

    #[tokio::test]
    async fn test_drop_non_pdf_path_ends_drag() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();

        let form = form_with(Reply::Ok(None));
        form.set_drag_active(true).await;
        form.accept_dropped_paths(vec![notes]).await;

        assert_eq!(form.snapshot().await.drop_zone_text, PROMPT_IDLE);
        assert_eq!(form.notifier().descriptions(), vec![MSG_NOT_PDF]);
    }

    #[tokio::test]
    async fn test_drop_unreadable_path_ends_drag_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("kept.pdf")]).await;
        form.set_drag_active(true).await;

        form.accept_dropped_paths(vec![dir.path().join("vanished.pdf")]).await;

        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("kept.pdf")
        );
        let toasts = form.notifier().toasts.lock().unwrap().clone();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].status, ToastStatus::Error);
        assert!(toasts[0].description.contains("vanished.pdf"), "got: {}", toasts[0].description);
    }

    #[tokio::test]
    async fn test_drop_unreadable_path_on_empty_form_restores_idle_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let form = form_with(Reply::Ok(None));
        form.set_drag_active(true).await;
        assert_eq!(form.snapshot().await.drop_zone_text, PROMPT_DRAG_ACTIVE);

        form.accept_dropped_paths(vec![dir.path().join("vanished.pdf")]).await;

        assert_eq!(form.snapshot().await.drop_zone_text, PROMPT_IDLE);
        assert_eq!(form.notifier().descriptions().len(), 1);
    }

    // --- presentation ---

    #[tokio::test]
    async fn test_drop_zone_prompts() {
        let form = form_with(Reply::Ok(None));
        assert_eq!(form.snapshot().await.drop_zone_text, PROMPT_IDLE);
        form.set_drag_active(true).await;
        assert_eq!(form.snapshot().await.drop_zone_text, PROMPT_DRAG_ACTIVE);
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        assert_eq!(form.snapshot().await.drop_zone_text, "Selected file: doc.pdf");
    }

    #[tokio::test]
    async fn test_idle_snapshot() {
        let form = form_with(Reply::Ok(None));
        form.set_password("pw").await;
        let snap = form.snapshot().await;
        assert!(snap.has_password);
        assert!(!snap.submitting);
        assert!(snap.can_submit);
        assert_eq!(snap.button_label, LABEL_IDLE);
    }

    // --- submit preconditions ---

    #[tokio::test]
    async fn test_submit_without_file_sends_nothing() {
        let form = form_with(Reply::Ok(None));
        form.set_password("secret").await;

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::MissingFile));
        assert_eq!(form.api().call_count(), 0);
        assert_eq!(form.notifier().descriptions(), vec![MSG_NO_FILE]);
        assert!(!form.snapshot().await.submitting);
    }

    #[tokio::test]
    async fn test_submit_without_password_sends_nothing() {
        let form = form_with(Reply::Ok(None));
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::MissingPassword));
        assert_eq!(form.api().call_count(), 0);
        assert_eq!(form.notifier().descriptions(), vec![MSG_NO_PASSWORD]);
    }

    #[tokio::test]
    async fn test_missing_file_reported_before_missing_password() {
        let form = form_with(Reply::Ok(None));
        form.submit().await;
        assert_eq!(form.notifier().descriptions(), vec![MSG_NO_FILE]);
    }

    // --- submit success ---

    #[tokio::test]
    async fn test_submit_sends_file_and_password() {
        let form = ready_form(Reply::Ok(None)).await;
        form.submit().await;

        let calls = form.api().calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "doc.pdf");
        assert_eq!(calls[0].1, b"contents of doc.pdf".to_vec());
        assert_eq!(calls[0].2, "secret");
    }

    #[tokio::test]
    async fn test_submit_success_uses_header_file_name() {
        let form = ready_form(Reply::Ok(Some(
            r#"attachment; filename="clean.pdf""#.to_string(),
        )))
        .await;

        let outcome = form.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Unlocked {
                file_name: "clean.pdf".into(),
                artifact: DeliveredArtifact::Downloaded {
                    path: PathBuf::from("clean.pdf")
                },
            }
        );
        let delivered = form.delivery().delivered.lock().unwrap().clone();
        assert_eq!(delivered, vec![(b"%PDF-unlocked".to_vec(), "clean.pdf".to_string())]);
    }

    #[tokio::test]
    async fn test_submit_success_falls_back_to_prefixed_name() {
        let form = ready_form(Reply::Ok(None)).await;
        match form.submit().await {
            SubmitOutcome::Unlocked { file_name, .. } => assert_eq!(file_name, "unlocked_doc.pdf"),
            other => panic!("Expected Unlocked, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_success_resets_form_and_notifies() {
        let form = ready_form(Reply::Ok(None)).await;
        form.submit().await;

        let snap = form.snapshot().await;
        assert!(snap.selected_file_name.is_none());
        assert!(!snap.has_password);
        assert!(!snap.submitting);
        assert_eq!(snap.button_label, LABEL_IDLE);

        let toasts = form.notifier().toasts.lock().unwrap().clone();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].status, ToastStatus::Success);
        assert_eq!(toasts[0].description, MSG_UNLOCKED);

        // A reset form rejects a resubmit without touching the network.
        assert_eq!(
            form.submit().await,
            SubmitOutcome::Rejected(RejectReason::MissingFile)
        );
        assert_eq!(form.api().call_count(), 1);
    }

    // --- submit failure ---

    #[tokio::test]
    async fn test_submit_rejected_status_keeps_inputs() {
        let form = ready_form(Reply::Status(401)).await;

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Failed);

        let snap = form.snapshot().await;
        assert_eq!(snap.selected_file_name.as_deref(), Some("doc.pdf"));
        assert!(snap.has_password);
        assert!(!snap.submitting);
        assert_eq!(form.notifier().descriptions(), vec![MSG_UNLOCK_FAILED]);
        assert!(form.delivery().delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_network_failure_uses_same_message() {
        let form = ready_form(Reply::Network).await;
        assert_eq!(form.submit().await, SubmitOutcome::Failed);
        assert_eq!(form.notifier().descriptions(), vec![MSG_UNLOCK_FAILED]);
    }

    #[tokio::test]
    async fn test_submit_delivery_failure_counts_as_failure() {
        let form = UnlockForm::new(
            FakeApi::replying(Reply::Ok(None)),
            RecordingDelivery {
                fail: true,
                ..RecordingDelivery::default()
            },
            RecordingNotifier::default(),
        );
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        form.set_password("secret").await;

        assert_eq!(form.submit().await, SubmitOutcome::Failed);
        assert_eq!(form.notifier().descriptions(), vec![MSG_UNLOCK_FAILED]);
        assert_eq!(
            form.snapshot().await.selected_file_name.as_deref(),
            Some("doc.pdf")
        );
    }

    #[tokio::test]
    async fn test_failed_submit_can_be_retried_by_user() {
        let form = ready_form(Reply::Status(500)).await;
        form.submit().await;
        form.submit().await;
        assert_eq!(form.api().call_count(), 2);
        assert!(!form.snapshot().await.submitting);
    }

    // --- in-flight ---

    #[tokio::test]
    async fn test_in_flight_state_and_duplicate_submit() {
        let form = UnlockForm::new(
            FakeApi::gated(Reply::Ok(None)),
            RecordingDelivery::default(),
            RecordingNotifier::default(),
        );
        form.accept_dropped_files(vec![pdf("doc.pdf")]).await;
        form.set_password("secret").await;
        let (entered, release) = form.api().gate.as_ref().unwrap();

        let (outcome, observed) = tokio::join!(form.submit(), async {
            entered.notified().await;
            let during = form.snapshot().await;
            let second = form.submit().await;
            release.notify_one();
            (during, second)
        });
        let (during, second) = observed;

        assert!(during.submitting);
        assert!(!during.can_submit);
        assert_eq!(during.button_label, LABEL_SUBMITTING);
        assert_eq!(second, SubmitOutcome::Busy);
        assert!(matches!(outcome, SubmitOutcome::Unlocked { .. }));
        assert_eq!(form.api().call_count(), 1);
        assert!(!form.snapshot().await.submitting);
        assert_eq!(form.notifier().descriptions(), vec![MSG_UNLOCKED]);
    }
}
