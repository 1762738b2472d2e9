//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{HealthResponse, ReadinessResponse};
use rolodex_core::{ErrorResponse, FieldError};
use rolodex_service::{
    ContactRequest, ContactResponse, LoginRequest, MessageResponse, RegisterRequest, RequestEmail,
    TokenResponse, UpdateAvatarRequest, UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Rolodex API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rolodex API",
        version = "1.0.0",
        description = "Personal contact book with email-confirmed accounts",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::confirmed_email,
        crate::controllers::auth_controller::request_email,
        crate::controllers::user_controller::me,
        crate::controllers::user_controller::update_avatar,
        crate::controllers::contact_controller::list_contacts,
        crate::controllers::contact_controller::upcoming_birthdays,
        crate::controllers::contact_controller::get_contact,
        crate::controllers::contact_controller::create_contact,
        crate::controllers::contact_controller::update_contact,
        crate::controllers::contact_controller::delete_contact,
        crate::controllers::health_controller::healthchecker,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::health_controller::readiness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            RequestEmail,
            MessageResponse,
            UserResponse,
            UpdateAvatarRequest,
            ContactRequest,
            ContactResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, confirmation and login"),
        (name = "users", description = "The authenticated user"),
        (name = "contacts", description = "Contacts owned by the authenticated user"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Bearer token scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
