//! Authentication-related DTOs.

use rolodex_core::rules::valid_username;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "valid_username"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 4, max = 128, message = "Password must be 4-128 characters"))]
    pub password: String,
}

/// Login request, sent as an OAuth2 password-flow form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    #[must_use]
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Request to resend the confirmation email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RequestEmail {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Simple message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register("alice", "alice@x.com", "pw1234").validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_email_as_username() {
        assert!(register("alice@x.com", "alice@x.com", "pw1234").validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let errors = register("alice", "alice@x.com", "pw").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_login_form_decodes() {
        let request: LoginRequest = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "password": "pw123"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_token_response_is_bearer() {
        let token = TokenResponse::bearer("abc".to_string());
        assert_eq!(token.token_type, "bearer");
    }
}
