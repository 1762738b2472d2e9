//! Typed cache of resolved users.
//!
//! Every fault is swallowed here: a failed read is a miss and a failed
//! write or delete is logged. Callers stay correct with the cache down.

use super::{cache_keys, CacheExt, CacheInterface};
use async_trait::async_trait;
use rolodex_core::User;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifetime of a cached user entry.
pub const USER_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Cache of users keyed by username.
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Returns the cached user, or `None` on a miss or any cache fault.
    async fn get(&self, username: &str) -> Option<User>;

    /// Stores `user` under its username with [`USER_CACHE_TTL`].
    async fn set(&self, user: &User);

    /// Drops the entry for `username`.
    async fn invalidate(&self, username: &str);
}

/// [`UserCache`] over any [`CacheInterface`], normally Redis.
pub struct RedisUserCache {
    cache: Arc<dyn CacheInterface>,
}

impl RedisUserCache {
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, username: &str) -> Option<User> {
        let key = cache_keys::user_by_username(username);
        match self.cache.get::<User>(&key).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Cache read for '{}' failed, falling back to directory: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, user: &User) {
        let key = cache_keys::user_by_username(&user.username);
        if let Err(e) = self.cache.set(&key, user, USER_CACHE_TTL).await {
            warn!("Cache write for '{}' failed: {}", key, e);
        }
    }

    async fn invalidate(&self, username: &str) {
        let key = cache_keys::user_by_username(username);
        match self.cache.delete(&key).await {
            Ok(existed) => debug!("Invalidated '{}' (present: {})", key, existed),
            Err(e) => warn!("Cache invalidation for '{}' failed: {}", key, e),
        }
    }
}
