pub mod bug;
pub mod user;

pub use bug::{AssignBug, Bug, BugResponse, BugStatus, DeleteResponse, NewBug, UpdateBugStatus};
pub use user::{AuthResponse, CreateUserRequest, LoginRequest, User, UserResponse, UserRole};
