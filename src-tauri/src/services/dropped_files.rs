//! Dropped file resolution for drag-and-drop and file-picker support.
//!
//! Hosts hand us filesystem paths; the form wants in-memory files carrying a
//! MIME type. The type is guessed from the extension, the same way a browser
//! file input labels a picked file, and an unknown extension yields an empty
//! type (which the form then rejects).

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::file::SelectedFile;

/// Reads one dropped path into a selectable file.
///
/// Returns `Ok(None)` for paths the drop surface cannot offer as a file
/// (directories, names that are not valid UTF-8).
fn read_file_entry(path: &Path) -> Result<Option<SelectedFile>, AppError> {
    if !path.is_file() {
        log::debug!("Skipping non-file drop entry: {}", path.display());
        return Ok(None);
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n.to_string(),
        None => return Ok(None),
    };
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or_default()
        .to_string();
    let contents = std::fs::read(path)?;
    Ok(Some(SelectedFile::new(name, mime_type, contents)))
}

/// Resolves dropped paths into in-memory files, preserving drop order.
///
/// - Regular files are read and typed by extension.
/// - Directories are skipped.
/// - Returns an error if any path does not exist.
pub async fn resolve_dropped_paths(paths: Vec<PathBuf>) -> crate::error::Result<Vec<SelectedFile>> {
    tokio::task::spawn_blocking(move || resolve_paths_inner(&paths))
        .await
        .map_err(|e| AppError::Internal(format!("spawn_blocking join error: {}", e)))?
}

fn resolve_paths_inner(paths: &[PathBuf]) -> crate::error::Result<Vec<SelectedFile>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(AppError::Io(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
        if let Some(file) = read_file_entry(path)? {
            files.push(file);
        }
    }
    Ok(files)
}
