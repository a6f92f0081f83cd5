pub mod auth;
pub mod rate_limit;

pub use auth::require_bearer;
pub use rate_limit::{rate_limit, RateLimiter};
