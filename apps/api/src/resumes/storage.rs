//! Local file storage for uploaded resumes.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::AppError;

/// Strips any path components and control characters from a
/// client-supplied filename.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Writes an upload under the configured directory with a short unique
/// prefix, so repeated uploads of the same filename never collide.
/// Returns the stored path and the stored filename.
pub async fn save_upload(
    upload_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<(PathBuf, String), AppError> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Storage(format!("failed to create upload directory: {e}")))?;

    let prefix = Uuid::new_v4().to_string();
    let stored_name = format!("{}_{}", &prefix[..8], sanitize_filename(original_name));
    let path = upload_dir.join(&stored_name);

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("failed to write upload: {e}")))?;

    Ok((path, stored_name))
}
