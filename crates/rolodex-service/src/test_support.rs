//! Doubles and fixtures shared by the unit tests of this crate.

use crate::cache::{CacheInterface, UserCache};
use crate::mail::{ConfirmationEmail, MailDispatcher};
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use rolodex_config::SecurityConfig;
use rolodex_core::{Email, NewUser, RolodexError, RolodexResult, User, UserId};
use rolodex_repository::UserDirectory;
use rolodex_security::TokenCodec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const TEST_SECRET: &str = "rolodex-service-test-secret-0123456789";

mock! {
    pub Directory {}

    #[async_trait]
    impl UserDirectory for Directory {
        async fn find_by_id(&self, id: UserId) -> RolodexResult<Option<User>>;
        async fn find_by_username(&self, username: &str) -> RolodexResult<Option<User>>;
        async fn find_by_email(&self, email: &Email) -> RolodexResult<Option<User>>;
        async fn create(&self, candidate: NewUser, avatar: Option<String>) -> RolodexResult<User>;
        async fn confirm_email(&self, email: &Email) -> RolodexResult<()>;
        async fn update(&self, user: &User) -> RolodexResult<()>;
    }
}

mock! {
    pub Cache {}

    #[async_trait]
    impl UserCache for Cache {
        async fn get(&self, username: &str) -> Option<User>;
        async fn set(&self, user: &User);
        async fn invalidate(&self, username: &str);
    }
}

pub(crate) fn codec() -> Arc<TokenCodec> {
    let config = SecurityConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..Default::default()
    };
    Arc::new(TokenCodec::new(&config).unwrap())
}

pub(crate) fn user(id: i64, username: &str, email: &str) -> User {
    User {
        id: UserId::new(id),
        username: username.to_string(),
        email: Email::new_unchecked(email),
        password_hash: String::new(),
        confirmed: true,
        avatar: None,
        created_at: Utc::now(),
    }
}

/// In-memory [`CacheInterface`] that can be switched into a failing mode.
#[derive(Default)]
pub(crate) struct MemoryCache {
    pub(crate) entries: Mutex<HashMap<String, (String, Duration)>>,
    pub(crate) broken: bool,
}

impl MemoryCache {
    pub(crate) fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    fn check(&self) -> RolodexResult<()> {
        if self.broken {
            return Err(RolodexError::Cache("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheInterface for MemoryCache {
    async fn get_raw(&self, key: &str) -> RolodexResult<Option<String>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RolodexResult<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> RolodexResult<bool> {
        self.check()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> RolodexResult<bool> {
        self.check()?;
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Dispatcher that records messages, optionally failing every send.
#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    pub(crate) sent: Mutex<Vec<ConfirmationEmail>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl MailDispatcher for RecordingDispatcher {
    async fn send_confirmation(&self, email: &ConfirmationEmail) -> RolodexResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(RolodexError::internal("smtp down"));
        }
        Ok(())
    }
}
