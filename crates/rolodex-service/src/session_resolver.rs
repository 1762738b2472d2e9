//! Bearer token to authenticated user.

use crate::cache::UserCache;
use rolodex_core::{RolodexError, RolodexResult, User};
use rolodex_repository::UserDirectory;
use rolodex_security::TokenCodec;
use std::sync::Arc;
use tracing::{debug, warn};

/// Message returned for every failed authentication.
pub const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Resolves access tokens to users through the user cache, falling back to
/// the directory on a miss.
///
/// The cache key is derived from the token subject, so the token is always
/// verified first. A hit makes no directory call; a miss makes exactly one
/// and fills the cache. Every failure is [`RolodexError::Unauthenticated`].
pub struct SessionResolver {
    tokens: Arc<TokenCodec>,
    directory: Arc<dyn UserDirectory>,
    cache: Arc<dyn UserCache>,
}

impl SessionResolver {
    pub fn new(
        tokens: Arc<TokenCodec>,
        directory: Arc<dyn UserDirectory>,
        cache: Arc<dyn UserCache>,
    ) -> Self {
        Self {
            tokens,
            directory,
            cache,
        }
    }

    /// Returns the user the access token was issued to.
    pub async fn resolve(&self, token: &str) -> RolodexResult<User> {
        let username = self.tokens.decode(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            RolodexError::unauthenticated(CREDENTIALS_ERROR)
        })?;

        if let Some(user) = self.cache.get(&username).await {
            debug!("Session resolved from cache: {}", user.id);
            return Ok(user);
        }

        let user = self
            .directory
            .find_by_username(&username)
            .await
            .map_err(|e| {
                warn!("Directory lookup failed during authentication: {}", e);
                RolodexError::unauthenticated(CREDENTIALS_ERROR)
            })?
            .ok_or_else(|| {
                debug!("Token subject has no matching user");
                RolodexError::unauthenticated(CREDENTIALS_ERROR)
            })?;

        self.cache.set(&user).await;
        debug!("Session resolved from directory: {}", user.id);
        Ok(user)
    }
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RedisUserCache;
    use crate::test_support::{codec, user, MemoryCache, MockCache, MockDirectory};
    use rolodex_config::SecurityConfig;
    use rolodex_core::UserId;

    fn alice() -> User {
        user(1, "alice", "alice@x.com")
    }

    fn assert_unauthenticated(result: RolodexResult<User>) {
        match result {
            Err(RolodexError::Unauthenticated(message)) => assert_eq!(message, CREDENTIALS_ERROR),
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_directory() {
        let tokens = codec();
        let token = tokens.issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory.expect_find_by_username().never();

        let mut cache = MockCache::new();
        cache
            .expect_get()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Some(alice()));
        cache.expect_set().never();

        let resolver = SessionResolver::new(tokens, Arc::new(directory), Arc::new(cache));
        let user = resolver.resolve(&token).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_cache_miss_queries_directory_once_and_fills_cache() {
        let tokens = codec();
        let token = tokens.issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_username()
            .withf(|username| username == "alice")
            .times(1)
            .returning(|_| Ok(Some(alice())));

        let mut cache = MockCache::new();
        cache.expect_get().times(1).returning(|_| None);
        cache
            .expect_set()
            .withf(|user| user.username == "alice")
            .times(1)
            .return_const(());

        let resolver = SessionResolver::new(tokens, Arc::new(directory), Arc::new(cache));
        let user = resolver.resolve(&token).await.unwrap();
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let tokens = codec();
        let token = tokens.issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(alice())));

        let cache = Arc::new(RedisUserCache::new(Arc::new(MemoryCache::default())));
        let resolver = SessionResolver::new(tokens, Arc::new(directory), cache);

        resolver.resolve(&token).await.unwrap();
        resolver.resolve(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_broken_cache_still_resolves() {
        let tokens = codec();
        let token = tokens.issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_username()
            .times(2)
            .returning(|_| Ok(Some(alice())));

        let cache = Arc::new(RedisUserCache::new(Arc::new(MemoryCache::broken())));
        let resolver = SessionResolver::new(tokens, Arc::new(directory), cache);

        assert!(resolver.resolve(&token).await.is_ok());
        assert!(resolver.resolve(&token).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthenticated() {
        let mut directory = MockDirectory::new();
        directory.expect_find_by_username().never();
        let mut cache = MockCache::new();
        cache.expect_get().never();

        let resolver = SessionResolver::new(codec(), Arc::new(directory), Arc::new(cache));
        assert_unauthenticated(resolver.resolve("not-a-jwt").await);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_unauthenticated() {
        let other = SecurityConfig {
            jwt_secret: "a-completely-different-secret-9876543210".to_string(),
            ..Default::default()
        };
        let token = TokenCodec::new(&other).unwrap().issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory.expect_find_by_username().never();
        let mut cache = MockCache::new();
        cache.expect_get().never();

        let resolver = SessionResolver::new(codec(), Arc::new(directory), Arc::new(cache));
        assert_unauthenticated(resolver.resolve(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthenticated() {
        let tokens = codec();
        let token = tokens.issue_access("ghost").unwrap();

        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| None);
        cache.expect_set().never();

        let resolver = SessionResolver::new(tokens, Arc::new(directory), Arc::new(cache));
        assert_unauthenticated(resolver.resolve(&token).await);
    }

    #[tokio::test]
    async fn test_directory_failure_is_unauthenticated() {
        let tokens = codec();
        let token = tokens.issue_access("alice").unwrap();

        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_username()
            .returning(|_| Err(RolodexError::Database("connection reset".to_string())));
        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| None);

        let resolver = SessionResolver::new(tokens, Arc::new(directory), Arc::new(cache));
        assert_unauthenticated(resolver.resolve(&token).await);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthenticated() {
        let tokens = codec();
        let token = tokens.issue("alice", 1).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

        let mut directory = MockDirectory::new();
        directory.expect_find_by_username().never();
        let mut cache = MockCache::new();
        cache.expect_get().never();

        let resolver = SessionResolver::new(tokens, Arc::new(directory), Arc::new(cache));
        assert_unauthenticated(resolver.resolve(&token).await);
    }
}
