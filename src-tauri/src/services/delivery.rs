//! Delivery of an unlocked PDF to the user.
//!
//! Mobile platforms get the document opened in a viewer through an ephemeral
//! object URL; desktop platforms get it saved as a named download. Object URLs
//! are `file://` URLs of blob files inside a private temporary directory, and
//! are revoked explicitly: right after a download is written, or when the
//! `BlobStore` drops for URLs handed to a viewer.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use url::Url;

use crate::error::AppError;

/// User-agent signatures treated as mobile devices.
const MOBILE_UA_PATTERN: &str = r"(?i)iPhone|iPad|iPod|Android";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mobile,
    Desktop,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str) -> Self {
        match Regex::new(MOBILE_UA_PATTERN) {
            Ok(re) if re.is_match(user_agent) => Platform::Mobile,
            Ok(_) => Platform::Desktop,
            Err(e) => {
                log::error!("Mobile user-agent pattern failed to compile: {}", e);
                Platform::Desktop
            }
        }
    }

    /// Platform of the running build.
    pub fn current() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }

    /// A configured user agent wins over the build target.
    pub fn detect(user_agent: Option<&str>) -> Self {
        user_agent
            .map(Self::from_user_agent)
            .unwrap_or_else(Self::current)
    }
}

/// What the user ended up with after a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeliveredArtifact {
    Downloaded { path: PathBuf },
    Opened { url: String },
}

/// An ephemeral reference to blob data held by a `BlobStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    url: Url,
    path: PathBuf,
}

impl ObjectUrl {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Issues and revokes object URLs. Dropping the store revokes everything it
/// still holds.
pub struct BlobStore {
    dir: tempfile::TempDir,
    live: Mutex<HashSet<PathBuf>>,
}

impl BlobStore {
    pub fn new() -> crate::error::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pdf-unlocker-blobs-")
            .tempdir()?;
        Ok(Self {
            dir,
            live: Mutex::new(HashSet::new()),
        })
    }

    /// Stores a PDF blob and returns a URL that a viewer or copier can read.
    pub async fn create_object_url(&self, data: &[u8]) -> crate::error::Result<ObjectUrl> {
        let path = self
            .dir
            .path()
            .join(format!("blob-{}.pdf", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&path, data).await?;
        let url = Url::from_file_path(&path).map_err(|_| {
            AppError::Internal(format!("Cannot form a URL for {}", path.display()))
        })?;
        self.live.lock().await.insert(path.clone());
        Ok(ObjectUrl { url, path })
    }

    /// Releases the blob behind `object`. Revoking twice is a no-op.
    pub async fn revoke(&self, object: &ObjectUrl) -> crate::error::Result<()> {
        if !self.live.lock().await.remove(&object.path) {
            return Ok(());
        }
        match tokio::fs::remove_file(&object.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn live_count(&self) -> usize {
        self.live.lock().await.len()
    }
}

/// Opens a URL in a new viewing context.
pub trait Viewer: Send + Sync {
    fn open(&self, url: &Url) -> crate::error::Result<()>;
}

/// Hands the URL to the operating system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open(&self, url: &Url) -> crate::error::Result<()> {
        open::that(url.as_str())
            .map_err(|e| AppError::Io(format!("Failed to open {}: {}", url, e)))
    }
}

/// Delivery seam used by the form controller.
pub trait Delivery: Send + Sync {
    fn deliver(
        &self,
        data: Vec<u8>,
        file_name: String,
    ) -> impl Future<Output = std::result::Result<DeliveredArtifact, AppError>> + Send;
}

/// Forks on the platform: view on mobile, download on desktop.
pub struct PlatformDelivery<V> {
    platform: Platform,
    blobs: BlobStore,
    download_dir: PathBuf,
    viewer: V,
}

impl<V: Viewer> PlatformDelivery<V> {
    pub fn new(platform: Platform, download_dir: PathBuf, viewer: V) -> crate::error::Result<Self> {
        Ok(Self {
            platform,
            blobs: BlobStore::new()?,
            download_dir,
            viewer,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    async fn view(&self, data: &[u8]) -> crate::error::Result<DeliveredArtifact> {
        let object = self.blobs.create_object_url(data).await?;
        if let Err(e) = self.viewer.open(object.url()) {
            self.blobs.revoke(&object).await?;
            return Err(e);
        }
        log::info!("Opened unlocked PDF at {}", object.url());
        Ok(DeliveredArtifact::Opened {
            url: object.url().to_string(),
        })
    }

    async fn download(&self, data: &[u8], file_name: &str) -> crate::error::Result<DeliveredArtifact> {
        let object = self.blobs.create_object_url(data).await?;
        let written = self.write_download(&object, file_name).await;
        if let Err(e) = self.blobs.revoke(&object).await {
            log::warn!("Failed to revoke {}: {}", object.url(), e);
        }
        let path = written?;
        log::info!("Saved unlocked PDF to {}", path.display());
        Ok(DeliveredArtifact::Downloaded { path })
    }

    async fn write_download(&self, object: &ObjectUrl, file_name: &str) -> crate::error::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let (target, mut file) = create_download_file(&self.download_dir, file_name).await?;
        if let Err(e) = copy_blob(object, &mut file).await {
            let _ = tokio::fs::remove_file(&target).await;
            return Err(e);
        }
        Ok(target)
    }
}

async fn copy_blob(object: &ObjectUrl, target: &mut tokio::fs::File) -> crate::error::Result<()> {
    let mut blob = tokio::fs::File::open(object.path()).await?;
    tokio::io::copy(&mut blob, target).await?;
    target.flush().await?;
    Ok(())
}

impl<V: Viewer> Delivery for PlatformDelivery<V> {
    async fn deliver(&self, data: Vec<u8>, file_name: String) -> crate::error::Result<DeliveredArtifact> {
        match self.platform {
            // The viewer path names nothing; the blob URL is all it gets.
            Platform::Mobile => self.view(&data).await,
            Platform::Desktop => self.download(&data, &file_name).await,
        }
    }
}

/// Name of the `n`th download candidate: `name.pdf`, `name (1).pdf`, ...
pub fn download_candidate_name(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    match as_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", stem, n),
    }
}

/// Creates the first free download file for `file_name` in `dir`.
///
/// Each candidate is opened with `create_new`, so an existing file is never
/// truncated, even one that appears after the directory was last looked at.
pub async fn create_download_file(
    dir: &Path,
    file_name: &str,
) -> crate::error::Result<(PathBuf, tokio::fs::File)> {
    let mut n: u32 = 0;
    loop {
        let candidate = dir.join(download_candidate_name(file_name, n));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && n < u32::MAX => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
