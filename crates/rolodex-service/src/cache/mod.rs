//! Caching infrastructure for the service layer.
//!
//! A raw key/value [`CacheInterface`] with a Redis implementation, and the
//! typed [`UserCache`] the session resolver reads through.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;
mod user_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::RedisCacheService;
pub use user_cache::{RedisUserCache, UserCache, USER_CACHE_TTL};
