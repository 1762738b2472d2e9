//! User entity.

use super::email::Email;
use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account holder.
///
/// The serialised form omits the password hash, so a `User` can be cached
/// or returned to clients without leaking credentials. Deserialising that
/// form yields an empty hash, which never verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Unique username; the subject of access tokens.
    pub username: String,

    /// Unique email address; the subject of confirmation tokens.
    pub email: Email,

    /// Argon2 PHC string.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Whether the email address has been confirmed.
    pub confirmed: bool,

    /// Avatar URL.
    pub avatar: Option<String>,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Marks the email as confirmed.
    ///
    /// Returns `false` when the user was already confirmed; the flag never
    /// goes back to `false`.
    pub fn confirm(&mut self) -> bool {
        if self.confirmed {
            return false;
        }
        self.confirmed = true;
        true
    }

    /// Replaces the avatar URL.
    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        self.avatar = Some(avatar.into());
    }
}

/// Data for a user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Requested username.
    pub username: String,
    /// Requested email address.
    pub email: Email,
    /// Hash of the chosen password.
    pub password_hash: String,
}
