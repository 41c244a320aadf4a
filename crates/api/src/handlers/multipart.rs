//! Shared multipart form reading for photo and document uploads.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bluetape_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A parsed upload form: at most one `file` part plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Take the `file` part or fail with 400.
    pub fn take_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))
    }

    /// A trimmed, non-empty text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read every part of a multipart body. Unknown file parts are ignored.
pub async fn read_upload_form(mut multipart: Multipart, max_mb: u64) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_mb))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let filename = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| multipart_error(e, max_mb))?;
            form.file = Some(UploadedFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else if field.file_name().is_none() {
            let text = field.text().await.map_err(|e| multipart_error(e, max_mb))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// A body over the transport limit is reported as an oversized file.
fn multipart_error(err: MultipartError, max_mb: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Core(CoreError::FileTooLarge {
            size_bytes: body_limit_bytes(max_mb),
            max_mb,
        });
    }
    AppError::BadRequest(err.to_string())
}

/// Request body limit for upload routes: the file limit plus room for the
/// rest of the form, so most oversized files still reach validation.
pub fn body_limit_bytes(max_mb: u64) -> usize {
    max_mb
        .saturating_mul(2)
        .saturating_add(1)
        .saturating_mul(1024 * 1024) as usize
}
