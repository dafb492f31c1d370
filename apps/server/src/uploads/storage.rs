use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{AppError, AppResult};

/// URL prefix under which stored screenshots are served
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Extensions accepted for screenshots
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Validates an attachment before anything is written.
///
/// The extension must be on the allow-list and a declared content type, if
/// any, must be an image type. Returns the normalized (lowercase) extension.
pub fn validate_attachment(filename: &str, content_type: Option<&str>) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| AppError::Validation("Only image files are allowed!".to_string()))?;

    if let Some(content_type) = content_type {
        let is_image = content_type.starts_with("image/");
        // Generic binary is what most clients send when they don't know better
        let is_unknown = content_type == "application/octet-stream";
        if !is_image && !is_unknown {
            return Err(AppError::Validation(format!(
                "Only image files are allowed! Got content type '{}'",
                content_type
            )));
        }
    }

    Ok(ext)
}

/// Generates a unique stored file name: `bug-<millis>-<random>.<ext>`
pub fn generate_filename(ext: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("bug-{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

/// Public URL path for a stored file name
pub fn public_path(filename: &str) -> String {
    format!("{}/{}", UPLOAD_URL_PREFIX, filename)
}

/// Maps a stored public path back to a file inside `base_dir`.
///
/// Returns `None` for anything that is not a plain file name under the
/// upload prefix, so a crafted path can never escape the directory.
pub fn resolve_path(base_dir: &Path, public: &str) -> Option<PathBuf> {
    let name = public
        .strip_prefix(UPLOAD_URL_PREFIX)?
        .strip_prefix('/')?;

    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');

    is_plain.then(|| base_dir.join(name))
}

/// Writes a screenshot to the upload directory, returning its public path
pub async fn store_screenshot(base_dir: &Path, ext: &str, data: &[u8]) -> AppResult<String> {
    fs::create_dir_all(base_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let filename = generate_filename(ext);
    let path = base_dir.join(&filename);

    fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write screenshot: {}", e)))?;

    log::debug!("Stored screenshot {} ({} bytes)", path.display(), data.len());

    Ok(public_path(&filename))
}

/// Deletes a stored screenshot if the file exists.
/// Returns whether a file was removed.
pub async fn remove_screenshot(base_dir: &Path, public: &str) -> AppResult<bool> {
    let Some(path) = resolve_path(base_dir, public) else {
        log::warn!("Ignoring screenshot outside upload directory: {}", public);
        return Ok(false);
    };

    let exists = fs::try_exists(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to check screenshot: {}", e)))?;

    if !exists {
        return Ok(false);
    }

    fs::remove_file(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to delete screenshot: {}", e)))?;

    Ok(true)
}
