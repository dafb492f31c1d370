pub mod bug;
pub mod users;

pub use bug::BugService;
pub use users::UsersService;
