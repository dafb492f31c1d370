//! Bugtrack terminal client
//!
//! HTTP client, session handling and view state for the Bugtrack server.

pub mod api;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod form;
pub mod render;
pub mod session;
pub mod test_cases;
pub mod types;

pub use api::BugClient;
pub use dashboard::{Dashboard, SortDirection, SortField};
pub use detail::BugDetail;
pub use error::{ClientError, ClientResult};
pub use form::{CreateBugForm, Screenshot};
pub use session::{Session, SessionStore};
pub use test_cases::{TestCase, TestCaseFilter, TestCaseStatus};
pub use types::{Bug, BugStatus, User, UserRef};
