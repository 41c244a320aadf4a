//! Upload validation for photos and manual documents.

use crate::error::CoreError;

/// Content types accepted for issue photos.
pub const PHOTO_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/heic"];

/// Content types accepted for manual attachments.
pub const DOCUMENT_CONTENT_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Default upper bound for a single upload, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Which family of files an upload belongs to. Also names the storage subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Photo,
    Document,
}

impl UploadKind {
    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            Self::Photo => PHOTO_CONTENT_TYPES,
            Self::Document => DOCUMENT_CONTENT_TYPES,
        }
    }

    pub fn directory(self) -> &'static str {
        match self {
            Self::Photo => "photos",
            Self::Document => "documents",
        }
    }

    fn fallback_extension(self) -> &'static str {
        match self {
            Self::Photo => "jpg",
            Self::Document => "pdf",
        }
    }
}

/// Check content type and size for an upload.
pub fn validate_upload(
    kind: UploadKind,
    content_type: &str,
    size_bytes: usize,
    max_mb: u64,
) -> Result<(), CoreError> {
    let normalized = normalize_content_type(content_type);
    if !kind.allowed_types().contains(&normalized.as_str()) {
        return Err(CoreError::InvalidFileType {
            content_type: content_type.to_string(),
            allowed: kind.allowed_types().join(", "),
        });
    }
    if size_bytes == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size_bytes as u64 > max_mb.saturating_mul(BYTES_PER_MB) {
        return Err(CoreError::FileTooLarge { size_bytes, max_mb });
    }
    Ok(())
}

/// Lowercased content type without parameters (`image/JPEG; q=1` -> `image/jpeg`).
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// File extension for a stored upload, taken from its content type.
///
/// The client's file name never contributes: uploads are served by
/// extension, so a name like `evil.html` must not decide how bytes are
/// rendered.
pub fn extension_for(kind: UploadKind, content_type: &str) -> &'static str {
    match normalize_content_type(content_type).as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "application/pdf" => "pdf",
        _ => kind.fallback_extension(),
    }
}
