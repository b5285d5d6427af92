//! File models for drag-and-drop selection.

/// MIME type every selectable file must carry.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// An in-memory handle to a user-chosen file.
///
/// Produced by the drop surface (or a file picker) and held by the form
/// controller until a submission succeeds.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            contents,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

// Contents can be megabytes; keep them out of debug output.
impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.contents.len())
            .finish()
    }
}
