//! Bug detail view state.

use uuid::Uuid;

use crate::api::BugClient;
use crate::types::{Bug, BugStatus};

pub const LOAD_FAILED: &str = "Failed to load bug details";
pub const NOT_FOUND: &str = "Bug not found";
pub const STATUS_FAILED: &str = "Failed to update status";
pub const DELETE_FAILED: &str = "Failed to delete bug";
pub const ASSIGN_FAILED: &str = "Failed to assign bug";

/// Where the view goes after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Dashboard,
}

#[derive(Debug, Clone, Default)]
pub struct BugDetail {
    id: Option<Uuid>,
    pub bug: Option<Bug>,
    pub error: Option<String>,
    confirm_delete: bool,
}

impl BugDetail {
    /// Loads a bug by its id. Anything that is not a UUID is reported as
    /// not found without contacting the server.
    pub async fn load(client: &BugClient, id: &str) -> Self {
        let id = match Uuid::parse_str(id.trim()) {
            Ok(id) => id,
            Err(_) => {
                return Self {
                    error: Some(NOT_FOUND.to_string()),
                    ..Self::default()
                }
            }
        };

        let mut view = Self {
            id: Some(id),
            ..Self::default()
        };

        match client.fetch_bug(id).await {
            Ok(bug) => view.bug = Some(bug),
            Err(e) if e.is_not_found() => view.error = Some(NOT_FOUND.to_string()),
            Err(_) => view.error = Some(LOAD_FAILED.to_string()),
        }

        view
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Changes the status and updates the local copy on success
    pub async fn change_status(&mut self, client: &BugClient, status: BugStatus) {
        let Some(id) = self.id else {
            self.error = Some(STATUS_FAILED.to_string());
            return;
        };

        match client.update_status(id, status).await {
            Ok(updated) => {
                match &mut self.bug {
                    Some(bug) => bug.status = updated.status,
                    None => self.bug = Some(updated),
                }
                self.error = None;
            }
            Err(_) => self.error = Some(STATUS_FAILED.to_string()),
        }
    }

    pub async fn assign(&mut self, client: &BugClient, user_id: Option<Uuid>) {
        let Some(id) = self.id else {
            self.error = Some(ASSIGN_FAILED.to_string());
            return;
        };

        match client.assign(id, user_id).await {
            Ok(updated) => {
                self.bug = Some(updated);
                self.error = None;
            }
            Err(_) => self.error = Some(ASSIGN_FAILED.to_string()),
        }
    }

    /// First step of deleting: ask for confirmation
    pub fn request_delete(&mut self) {
        self.confirm_delete = true;
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    /// Deletes the bug once confirmed. Returns to the dashboard on success.
    pub async fn confirm_delete(&mut self, client: &BugClient) -> Navigation {
        if !self.confirm_delete {
            return Navigation::Stay;
        }

        let Some(id) = self.id else {
            self.error = Some(DELETE_FAILED.to_string());
            return Navigation::Stay;
        };

        match client.delete_bug(id).await {
            Ok(()) => {
                self.confirm_delete = false;
                self.bug = None;
                Navigation::Dashboard
            }
            Err(_) => {
                self.error = Some(DELETE_FAILED.to_string());
                Navigation::Stay
            }
        }
    }
}
