//! Authentication: JWT sessions and rate limiting

pub mod rate_limit;
pub mod session;

pub use session::{Identity, admin_middleware, auth_middleware, create_token};
