use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

pub const MIN_PRIORITY: i16 = 1;
pub const MAX_PRIORITY: i16 = 5;
pub const DEFAULT_PRIORITY: i16 = 2;

/// Workflow state of a bug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl BugStatus {
    pub const ALL: [BugStatus; 4] = [
        BugStatus::Open,
        BugStatus::InProgress,
        BugStatus::Resolved,
        BugStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BugStatus::Open => "open",
            BugStatus::InProgress => "in-progress",
            BugStatus::Resolved => "resolved",
            BugStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BugStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid status '{}'", s)))
    }
}

impl TryFrom<String> for BugStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Bug row with creator/assignee names resolved through joins
#[derive(Debug, Clone, FromRow)]
pub struct Bug {
    pub id: Uuid,
    pub serial_no: i32,
    pub title: String,
    pub description: String,
    pub steps: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: BugStatus,
    pub priority: i16,
    pub screenshot: Option<String>,
    pub created_by: Uuid,
    pub created_by_name: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub assigned_to_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference to a user, resolved to a display name when the user exists
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Response for API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugResponse {
    pub id: Uuid,
    pub serial_no: i32,
    pub title: String,
    pub description: String,
    pub steps: Option<String>,
    pub status: BugStatus,
    pub priority: i16,
    pub screenshot: Option<String>,
    pub created_by: UserRef,
    pub assigned_to: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new bug
#[derive(Debug, Clone)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub steps: Option<String>,
    pub priority: i16,
    pub screenshot: Option<String>,
    pub created_by: Uuid,
}

/// Request to change the workflow state
#[derive(Debug, Deserialize)]
pub struct UpdateBugStatus {
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to change the assignee. `null` clears the assignment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBug {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Confirmation returned after a delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl Bug {
    /// Converts to API response format
    pub fn to_response(&self) -> BugResponse {
        BugResponse {
            id: self.id,
            serial_no: self.serial_no,
            title: self.title.clone(),
            description: self.description.clone(),
            steps: self.steps.clone(),
            status: self.status,
            priority: self.priority,
            screenshot: self.screenshot.clone(),
            created_by: UserRef {
                id: self.created_by,
                name: self.created_by_name.clone(),
            },
            assigned_to: self.assigned_to.map(|id| UserRef {
                id,
                name: self.assigned_to_name.clone(),
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl NewBug {
    /// Builds a new bug from raw form values, applying defaults and field rules
    pub fn from_form(
        title: Option<&str>,
        description: Option<&str>,
        steps: Option<&str>,
        priority: Option<&str>,
        created_by: Uuid,
    ) -> Result<Self, AppError> {
        let title = title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let description = description.unwrap_or_default();
        if description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }

        let steps = steps
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string());

        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            steps,
            priority: parse_priority(priority)?,
            screenshot: None,
            created_by,
        })
    }
}

/// Parses an optional priority field. Absent or blank means the default.
pub fn parse_priority(raw: Option<&str>) -> Result<i16, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_PRIORITY),
        Some(raw) => raw,
    };

    let priority: i16 = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("Priority must be a number, got '{}'", raw)))?;

    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(AppError::Validation(format!(
            "Priority must be between {} and {}",
            MIN_PRIORITY, MAX_PRIORITY
        )));
    }

    Ok(priority)
}
