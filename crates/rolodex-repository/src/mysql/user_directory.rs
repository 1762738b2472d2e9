//! MySQL user directory.

use crate::{traits::UserDirectory, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolodex_core::{Email, NewUser, RolodexError, RolodexResult, User, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

/// MySQL-backed [`UserDirectory`].
#[derive(Clone, Debug)]
pub struct MySqlUserDirectory {
    pool: Arc<DatabasePool>,
}

impl MySqlUserDirectory {
    /// Creates a new MySQL user directory.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    confirmed: bool,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            username: row.username,
            email: Email::new_unchecked(row.email),
            password_hash: row.password_hash,
            confirmed: row.confirmed,
            avatar: row.avatar,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_by_id(&self, id: UserId) -> RolodexResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, confirmed, avatar, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> RolodexResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, confirmed, avatar, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &Email) -> RolodexResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, confirmed, avatar, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, candidate: NewUser, avatar: Option<String>) -> RolodexResult<User> {
        debug!("Creating user: {}", candidate.username);

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, confirmed, avatar)
            VALUES (?, ?, ?, FALSE, ?)
            "#,
        )
        .bind(&candidate.username)
        .bind(candidate.email.as_str())
        .bind(&candidate.password_hash)
        .bind(&avatar)
        .execute(self.pool.inner())
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| RolodexError::internal("Inserted user id out of range"))?;

        info!("User created: {} (id {})", candidate.username, id);

        self.find_by_id(UserId::new(id))
            .await?
            .ok_or_else(|| RolodexError::internal("Inserted user could not be read back"))
    }

    async fn confirm_email(&self, email: &Email) -> RolodexResult<()> {
        let result = sqlx::query("UPDATE users SET confirmed = TRUE WHERE email = ? AND confirmed = FALSE")
            .bind(email.as_str())
            .execute(self.pool.inner())
            .await?;

        debug!(
            "Confirm email for {}: {} row(s) changed",
            email,
            result.rows_affected()
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> RolodexResult<()> {
        debug!("Updating user: {}", user.id);

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, confirmed = (confirmed OR ?), avatar = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(user.confirmed)
        .bind(&user.avatar)
        .bind(user.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}
