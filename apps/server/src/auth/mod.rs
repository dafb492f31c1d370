pub mod extractors;
pub mod jwt;
pub mod token;

pub use extractors::{authenticate, bearer_token, AuthenticatedUser, Identity};
pub use jwt::{Claims, TokenKeys};
pub use token::{generate_secret, resolve_secret};
