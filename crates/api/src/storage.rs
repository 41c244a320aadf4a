//! Upload storage for issue photos and manual documents.
//!
//! [`FileStorage`] is the seam handlers write through; [`LocalFileStorage`]
//! keeps files under the configured upload directory, which the router
//! serves at [`PUBLIC_PREFIX`].

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bluetape_core::error::CoreError;
use bluetape_core::upload::{extension_for, validate_upload, UploadKind};
use serde::Serialize;
use uuid::Uuid;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The upload failed content-type or size validation.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error("File storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Location of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Public URL, e.g. `/uploads/photos/<uuid>.jpg`.
    pub url: String,
    /// Stored file name.
    pub filename: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Validate and store an issue photo.
    async fn save_photo(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredFile, StorageError>;

    /// Validate and store a manual document.
    async fn save_document(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredFile, StorageError>;

    /// Remove a stored file by URL. Missing files are not an error.
    async fn delete_file(&self, url: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Local disk implementation
// ---------------------------------------------------------------------------

/// Stores files on local disk under `root/<kind>/<uuid>.<ext>`.
pub struct LocalFileStorage {
    root: PathBuf,
    max_mb: u64,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, max_mb: u64) -> Self {
        Self {
            root: root.into(),
            max_mb,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn save(
        &self,
        kind: UploadKind,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredFile, StorageError> {
        validate_upload(kind, content_type, bytes.len(), self.max_mb)?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension_for(kind, content_type));
        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), bytes).await?;

        let url = format!("{PUBLIC_PREFIX}/{}/{filename}", kind.directory());
        tracing::debug!(%url, size_bytes = bytes.len(), "Stored upload");
        Ok(StoredFile { url, filename })
    }

    /// Map a public URL back to a path under the root.
    ///
    /// Returns `None` for URLs outside [`PUBLIC_PREFIX`] or containing
    /// anything other than plain path segments.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(PUBLIC_PREFIX)?.trim_start_matches('/');
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save_photo(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredFile, StorageError> {
        self.save(UploadKind::Photo, bytes, content_type).await
    }

    async fn save_document(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredFile, StorageError> {
        self.save(UploadKind::Document, bytes, content_type).await
    }

    async fn delete_file(&self, url: &str) -> Result<(), StorageError> {
        let Some(path) = self.resolve(url) else {
            tracing::warn!(url, "Ignoring delete for URL outside upload storage");
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
