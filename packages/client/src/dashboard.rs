//! Dashboard view state: the fetched bug list with sorting and search.

use std::cmp::Ordering;

use crate::api::BugClient;
use crate::types::Bug;

pub const LOAD_FAILED: &str = "Failed to load bugs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    SerialNo,
    Date,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    bugs: Vec<Bug>,
    search: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    pub error: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Dashboard {
    /// Newest first by default
    pub fn new(bugs: Vec<Bug>) -> Self {
        Self {
            bugs,
            search: String::new(),
            sort_field: SortField::Date,
            sort_direction: SortDirection::Desc,
            error: None,
        }
    }

    /// Fetches all bugs. A failure leaves the list empty with an error message.
    pub async fn load(client: &BugClient) -> Self {
        match client.fetch_bugs().await {
            Ok(bugs) => Self::new(bugs),
            Err(_) => Self {
                error: Some(LOAD_FAILED.to_string()),
                ..Self::default()
            },
        }
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn all(&self) -> &[Bug] {
        &self.bugs
    }

    /// Same field flips the direction; a new field starts ascending
    pub fn handle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn sort_by(&mut self, field: SortField, direction: SortDirection) {
        self.sort_field = field;
        self.sort_direction = direction;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Bugs to display: sorted, then filtered by the search term
    pub fn visible(&self) -> Vec<&Bug> {
        let mut sorted: Vec<&Bug> = self.bugs.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = compare(a, b, self.sort_field);
            match self.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let needle = self.search.to_lowercase();
        sorted
            .into_iter()
            .filter(|bug| {
                bug.title.to_lowercase().contains(&needle)
                    || bug.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

fn compare(a: &Bug, b: &Bug, field: SortField) -> Ordering {
    match field {
        SortField::SerialNo => a.serial_no.cmp(&b.serial_no),
        SortField::Date => a.created_at.cmp(&b.created_at),
        SortField::Priority => a.priority.cmp(&b.priority),
    }
}
