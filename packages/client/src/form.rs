//! Create-bug form state.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::api::BugClient;
use crate::error::{ClientError, ClientResult};
use crate::types::{Bug, DEFAULT_PRIORITY};

pub const MISSING_FIELDS: &str = "Please provide both title and description";
pub const CREATE_FAILED: &str = "Failed to create bug. Please try again.";

/// An image picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

impl Screenshot {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime,
            data,
        }
    }

    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::Validation(format!("Bad file name: {}", path.display())))?;

        Ok(Self::new(file_name, data))
    }

    /// Local preview as a `data:` URL
    pub fn preview_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct CreateBugForm {
    pub title: String,
    pub description: String,
    pub steps: String,
    pub priority: i16,
    pub screenshot: Option<Screenshot>,
    /// Message shown under the form after a failed submit
    pub error: Option<String>,
}

impl Default for CreateBugForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            steps: String::new(),
            priority: DEFAULT_PRIORITY,
            screenshot: None,
            error: None,
        }
    }
}

impl CreateBugForm {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }

    /// Multipart payload; `steps` is only sent when filled in
    pub fn to_multipart(&self) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("title", self.title.clone())
            .text("description", self.description.clone())
            .text("priority", self.priority.to_string());

        if !self.steps.is_empty() {
            form = form.text("steps", self.steps.clone());
        }

        if let Some(shot) = &self.screenshot {
            let part = Part::bytes(shot.data.clone())
                .file_name(shot.file_name.clone())
                .mime_str(&shot.mime)?;
            form = form.part("screenshot", part);
        }

        Ok(form)
    }

    /// Validates and submits the form.
    ///
    /// Incomplete forms never reach the network. Any server or transport
    /// failure is reported with the same message.
    pub async fn submit(&mut self, client: &BugClient) -> Option<Bug> {
        if !self.is_complete() {
            self.error = Some(MISSING_FIELDS.to_string());
            return None;
        }

        self.error = None;
        match client.create_bug(self).await {
            Ok(bug) => Some(bug),
            Err(_) => {
                self.error = Some(CREATE_FAILED.to_string());
                None
            }
        }
    }
}
