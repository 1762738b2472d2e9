//! User-related DTOs.

use rolodex_core::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_inner(),
            username: user.username,
            email: user.email.into(),
            avatar: user.avatar,
        }
    }
}

/// Request to change the avatar URL.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAvatarRequest {
    #[validate(url(message = "Invalid avatar URL"), length(max = 255))]
    pub avatar_url: String,
}
