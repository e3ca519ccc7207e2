// services/upload_reconciler.rs
//
// Decides which image a write persists: a new upload replaces the stored
// image whole, otherwise the stored one is kept as-is.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use rocket::fs::TempFile;
use tokio::fs::OpenOptions;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::Error;
use crate::models::image::{StoredImage, Upload};

pub const IMAGE_FIELD: &str = "image";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `<upload_dir>/<field>-<millis><.ext>`, keeping the original's last extension.
pub fn storage_path(upload_dir: &Path, field_name: &str, original_name: &str, timestamp_millis: i64) -> PathBuf {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    upload_dir.join(format!("{field_name}-{timestamp_millis}{ext}"))
}

/// Claims a fresh `storage_path` by creating it exclusively. A taken name
/// moves the timestamp forward by a millisecond until one is free.
pub async fn reserve(
    upload_dir: &Path,
    field_name: &str,
    original_name: &str,
    mut timestamp_millis: i64,
) -> std::io::Result<PathBuf> {
    loop {
        let path = storage_path(upload_dir, field_name, original_name, timestamp_millis);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => timestamp_millis += 1,
            Err(e) => return Err(e),
        }
    }
}

pub fn encode(upload: Upload) -> StoredImage {
    StoredImage::new(general_purpose::STANDARD.encode(&upload.bytes), upload.content_type)
}

pub fn reconcile(existing: Option<StoredImage>, upload: Option<Upload>) -> Result<StoredImage, Error> {
    match (upload, existing) {
        (Some(upload), _) => Ok(encode(upload)),
        (None, Some(existing)) => Ok(existing),
        (None, None) => Err(Error::validation("Please choose files")),
    }
}

/// Moves the temp file into the upload directory and reads it back.
/// Empty or missing files yield `None`.
pub async fn stage(file: Option<&mut TempFile<'_>>, config: &AppConfig) -> Result<Option<Upload>, Error> {
    let Some(file) = file else {
        return Ok(None);
    };
    if file.len() == 0 {
        return Ok(None);
    }

    let original_name = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_default();
    let content_type = file
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let path = reserve(&config.upload_dir, IMAGE_FIELD, &original_name, Utc::now().timestamp_millis()).await?;
    file.persist_to(&path).await?;
    let bytes = tokio::fs::read(&path).await?;
    debug!(path = %path.display(), size = bytes.len(), "staged upload");

    if !config.retain_uploads {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "failed to remove staged upload");
        }
    }

    Ok(Some(Upload {
        bytes,
        content_type,
        file_name: original_name,
    }))
}
