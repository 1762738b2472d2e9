//! Authenticated user extractor.

use crate::{responses::AppError, state::AppState};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use rolodex_core::{RolodexError, User};
use tracing::debug;

/// The user behind the request's bearer token.
///
/// Rejects with 401 and `WWW-Authenticate: Bearer` when the header is
/// missing or the token does not resolve to a user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    debug!("Missing or malformed Authorization header: {}", e);
                    AppError(RolodexError::unauthenticated("Not authenticated"))
                })?;

        let user = state.sessions.resolve(bearer.token()).await?;
        Ok(CurrentUser(user))
    }
}
