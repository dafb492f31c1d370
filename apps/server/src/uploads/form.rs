use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;

use crate::error::{AppError, AppResult};
use crate::uploads::storage::validate_attachment;

/// Upper bound for a single text field of the bug form
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Validated screenshot held in memory until the bug is persisted
#[derive(Debug)]
pub struct Attachment {
    pub extension: String,
    pub data: Bytes,
}

/// Raw fields of the bug report form
#[derive(Debug, Default)]
pub struct BugForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub priority: Option<String>,
    pub screenshot: Option<Attachment>,
}

/// Reads the multipart bug form.
///
/// The screenshot part is checked against the allow-list as soon as its
/// headers arrive and its size is enforced while streaming, so a rejected
/// attachment never reaches the disk.
pub async fn read_bug_form(mut payload: Multipart, max_file_size: usize) -> AppResult<BugForm> {
    let mut form = BugForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => form.title = Some(read_text(&mut field).await?),
            "description" => form.description = Some(read_text(&mut field).await?),
            "steps" => form.steps = Some(read_text(&mut field).await?),
            "priority" => form.priority = Some(read_text(&mut field).await?),
            "screenshot" => form.screenshot = read_attachment(&mut field, max_file_size).await?,
            other => {
                log::debug!("Ignoring unknown form field '{}'", other);
                drain(&mut field).await?;
            }
        }
    }

    Ok(form)
}

async fn read_attachment(field: &mut Field, max_file_size: usize) -> AppResult<Option<Attachment>> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();

    // An empty file input still produces a part, with no file name
    if filename.is_empty() {
        drain(field).await?;
        return Ok(None);
    }

    let content_type = field.content_type().map(|m| m.essence_str().to_string());
    let extension = validate_attachment(&filename, content_type.as_deref())?;

    let mut data = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Screenshot exceeds {} MB",
                max_file_size / (1024 * 1024)
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(Some(Attachment {
        extension,
        data: data.freeze(),
    }))
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::PayloadTooLarge(
                "Form field exceeds 64 KB".to_string(),
            ));
        }
        data.extend_from_slice(&chunk);
    }

    String::from_utf8(data)
        .map_err(|_| AppError::Validation("Form fields must be valid UTF-8".to_string()))
}

async fn drain(field: &mut Field) -> AppResult<()> {
    while field.try_next().await.map_err(multipart_error)?.is_some() {}
    Ok(())
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart payload: {}", e))
}
