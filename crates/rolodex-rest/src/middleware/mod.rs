//! HTTP middleware.

mod logging;
mod rate_limit;

pub use logging::logging_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
