//! Contact controller. Every route is scoped to the authenticated user.

use crate::{
    extractors::{CurrentUser, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rolodex_core::ContactId;
use rolodex_service::{BirthdayParams, ContactRequest, ContactResponse, ContactSearchParams};
use tracing::debug;

/// Creates the contact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/birthdays", get(upcoming_birthdays))
        .route(
            "/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

/// Search contacts.
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(ContactSearchParams),
    responses(
        (status = 200, description = "Matching contacts", body = [ContactResponse]),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ContactSearchParams>,
) -> ApiResult<Vec<ContactResponse>> {
    debug!("Contact search for {}: {:?}", user.id, params);
    let contacts = state.contact_service.search(user.id, params).await?;
    ok(contacts)
}

/// Contacts with a birthday in the coming days.
#[utoipa::path(
    get,
    path = "/api/contacts/birthdays",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(BirthdayParams),
    responses(
        (status = 200, description = "Upcoming birthdays", body = [ContactResponse]),
        (status = 400, description = "Window out of range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn upcoming_birthdays(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<BirthdayParams>,
) -> ApiResult<Vec<ContactResponse>> {
    let contacts = state
        .contact_service
        .upcoming_birthdays(user.id, params)
        .await?;
    ok(contacts)
}

/// One contact.
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn get_contact(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ContactResponse> {
    let contact = state.contact_service.get(user.id, ContactId::new(id)).await?;
    ok(contact)
}

/// Create a contact.
#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "contacts",
    security(("bearer_auth" = [])),
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn create_contact(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactResponse>>), AppError> {
    let contact = state.contact_service.create(user.id, request).await?;
    Ok(created(contact))
}

/// Replace a contact.
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Contact id")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ContactResponse),
        (status = 404, description = "Contact not found"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ContactRequest>,
) -> ApiResult<ContactResponse> {
    let contact = state
        .contact_service
        .update(user.id, ContactId::new(id), request)
        .await?;
    ok(contact)
}

/// Delete a contact.
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "contacts",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.contact_service.delete(user.id, ContactId::new(id)).await?;
    Ok(no_content())
}
