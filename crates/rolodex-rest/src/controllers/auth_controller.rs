//! Authentication controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use rolodex_service::{
    LoginRequest, MessageResponse, RegisterRequest, RequestEmail, TokenResponse, UserResponse,
};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/confirmed_email/:token", get(confirmed_email))
        .route("/request_email", post(request_email))
}

/// Register a new account.
///
/// The account stays unconfirmed until the emailed link is opened.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 409, description = "Email or username already taken"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!("Registration request for: {}", request.username);

    let user = state.auth_service.register(request).await?;
    Ok(created(UserResponse::from(user)))
}

/// Exchange username and password for an access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> ApiResult<TokenResponse> {
    debug!("Login request for: {}", request.username);

    let token = state.auth_service.login(request).await?;
    ok(token)
}

/// Confirm an email address from the emailed link.
#[utoipa::path(
    get,
    path = "/api/auth/confirmed_email/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Confirmation token")),
    responses(
        (status = 200, description = "Email confirmed", body = MessageResponse),
        (status = 400, description = "Invalid confirmation token")
    )
)]
pub async fn confirmed_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<MessageResponse> {
    let response = state.auth_service.confirm_email(&token).await?;
    ok(response)
}

/// Send the confirmation email again.
#[utoipa::path(
    post,
    path = "/api/auth/request_email",
    tag = "auth",
    request_body = RequestEmail,
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn request_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RequestEmail>,
) -> ApiResult<MessageResponse> {
    let response = state.auth_service.request_email(request).await?;
    ok(response)
}
