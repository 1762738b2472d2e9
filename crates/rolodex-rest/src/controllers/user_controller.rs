//! Current-user controller.

use crate::{
    extractors::{CurrentUser, ValidatedJson},
    middleware::{rate_limit_middleware, RateLimiter},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::State,
    middleware,
    routing::{get, patch},
    Router,
};
use rolodex_service::{UpdateAvatarRequest, UserResponse};

/// Creates the user router.
///
/// With a limiter, `GET /me` is rate limited per client address.
pub fn router(limiter: Option<RateLimiter>) -> Router<AppState> {
    let me_route = match limiter {
        Some(limiter) => Router::new()
            .route("/me", get(me))
            .route_layer(middleware::from_fn_with_state(limiter, rate_limit_middleware)),
        None => Router::new().route("/me", get(me)),
    };

    me_route.route("/avatar", patch(update_avatar))
}

/// The authenticated user.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<UserResponse> {
    let response = state.user_service.me(&user).await?;
    ok(response)
}

/// Replace the avatar URL of the authenticated user.
#[utoipa::path(
    patch,
    path = "/api/users/avatar",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Avatar updated", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<UpdateAvatarRequest>,
) -> ApiResult<UserResponse> {
    let response = state.user_service.update_avatar(&user, request).await?;
    ok(response)
}
