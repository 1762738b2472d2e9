//! Current-user operations.

use crate::cache::UserCache;
use crate::dto::{UpdateAvatarRequest, UserResponse};
use async_trait::async_trait;
use rolodex_core::{RolodexError, RolodexResult, User, ValidateExt};
use rolodex_repository::UserDirectory;
use std::sync::Arc;
use tracing::info;

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns the public view of an authenticated user.
    async fn me(&self, user: &User) -> RolodexResult<UserResponse>;

    /// Replaces the avatar URL of an authenticated user.
    async fn update_avatar(
        &self,
        user: &User,
        request: UpdateAvatarRequest,
    ) -> RolodexResult<UserResponse>;
}

/// User service implementation.
pub struct UserServiceImpl {
    directory: Arc<dyn UserDirectory>,
    cache: Arc<dyn UserCache>,
}

impl UserServiceImpl {
    pub fn new(directory: Arc<dyn UserDirectory>, cache: Arc<dyn UserCache>) -> Self {
        Self { directory, cache }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn me(&self, user: &User) -> RolodexResult<UserResponse> {
        Ok(UserResponse::from(user.clone()))
    }

    async fn update_avatar(
        &self,
        user: &User,
        request: UpdateAvatarRequest,
    ) -> RolodexResult<UserResponse> {
        request.validate_request()?;

        // The session user may come from the cache; mutate the stored record.
        let mut stored = self
            .directory
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| RolodexError::not_found("User", user.id))?;

        stored.set_avatar(request.avatar_url);
        self.directory.update(&stored).await?;
        self.cache.invalidate(&stored.username).await;

        info!("Avatar updated for user: {}", stored.id);
        Ok(UserResponse::from(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{user, MockCache, MockDirectory};
    use rolodex_core::UserId;

    #[tokio::test]
    async fn test_me_returns_public_view() {
        let service = UserServiceImpl::new(Arc::new(MockDirectory::new()), Arc::new(MockCache::new()));
        let response = service.me(&user(4, "alice", "alice@x.com")).await.unwrap();
        assert_eq!(response.id, 4);
        assert_eq!(response.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_update_avatar_persists_and_invalidates() {
        let mut directory = MockDirectory::new();
        directory
            .expect_find_by_id()
            .withf(|id| *id == UserId::new(4))
            .times(1)
            .returning(|_| {
                let mut stored = user(4, "alice", "alice@x.com");
                stored.password_hash = "$argon2id$stored".to_string();
                Ok(Some(stored))
            });
        directory
            .expect_update()
            .withf(|u| {
                u.avatar.as_deref() == Some("https://img.example.com/a.png")
                    && u.password_hash == "$argon2id$stored"
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut cache = MockCache::new();
        cache
            .expect_invalidate()
            .withf(|username| username == "alice")
            .times(1)
            .return_const(());

        let service = UserServiceImpl::new(Arc::new(directory), Arc::new(cache));
        let response = service
            .update_avatar(
                &user(4, "alice", "alice@x.com"),
                UpdateAvatarRequest {
                    avatar_url: "https://img.example.com/a.png".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(response.avatar.as_deref(), Some("https://img.example.com/a.png"));
    }

    #[tokio::test]
    async fn test_update_avatar_rejects_invalid_url() {
        let mut directory = MockDirectory::new();
        directory.expect_update().never();

        let service = UserServiceImpl::new(Arc::new(directory), Arc::new(MockCache::new()));
        let result = service
            .update_avatar(
                &user(4, "alice", "alice@x.com"),
                UpdateAvatarRequest {
                    avatar_url: "nope".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(RolodexError::Validation(_))));
    }
}
