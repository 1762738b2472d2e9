//! String-valued cache seam between the user cache and Redis.

use async_trait::async_trait;
use rolodex_core::RolodexResult;
use std::time::Duration;

/// Key/value cache holding JSON strings with a per-entry TTL.
///
/// Stores raw strings so the trait stays object safe; [`CacheExt`] adds
/// typed helpers on top.
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Value stored under `key`, or `None` when absent or expired.
    async fn get_raw(&self, key: &str) -> RolodexResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RolodexResult<()>;

    /// Removes `key`; `false` when nothing was stored.
    async fn delete(&self, key: &str) -> RolodexResult<bool>;

    async fn exists(&self, key: &str) -> RolodexResult<bool>;

    /// `false` for a cache built without a backend.
    fn is_enabled(&self) -> bool;
}

/// Typed get/set over any [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Reads and deserializes; a payload that fails to parse is an error.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> RolodexResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> RolodexResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
