//! Product image uploads.
//!
//! Client file names are reduced to a safe ASCII form and prefixed with a
//! short random tag so two uploads of `photo.jpg` don't overwrite each other.

use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

/// Image extensions accepted for product photos.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Errors storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file name has nothing usable left after sanitizing.
    #[error("invalid file name")]
    InvalidName,

    /// The extension is not an accepted image type.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// Writing to the upload directory failed.
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`.
///
/// Path components are dropped, whitespace becomes `_`, and leading dots
/// or underscores are stripped. Returns `None` if nothing is left.
#[must_use]
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Store an uploaded image in `dir`, returning the stored file name.
///
/// # Errors
///
/// Returns `UploadError::InvalidName` or `UploadError::UnsupportedType` for
/// unacceptable names, `UploadError::Io` if the write fails.
pub async fn save_image(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let safe = sanitize_filename(original_name).ok_or(UploadError::InvalidName)?;

    let extension = Path::new(&safe)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedType(extension));
    }

    let tag = Uuid::new_v4().simple().to_string();
    let stored = format!("{}_{safe}", tag.get(..8).unwrap_or(&tag));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&stored), bytes).await?;

    tracing::info!(file = %stored, size = bytes.len(), "Stored product image");
    Ok(stored)
}
