//! Validation utilities.

use crate::{FieldError, RolodexError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RolodexError` on failure.
    fn validate_request(&self) -> Result<(), RolodexError> {
        self.validate().map_err(validation_errors_to_rolodex_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect()
}

/// Converts `validator::ValidationErrors` to `RolodexError`.
#[must_use]
pub fn validation_errors_to_rolodex_error(errors: ValidationErrors) -> RolodexError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    RolodexError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a username meets requirements.
    ///
    /// Usernames never contain `@`, so an email address can never be
    /// mistaken for a username subject.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        if username.len() < 3 {
            return Err(ValidationError::new("username_too_short"));
        }
        if username.len() > 32 {
            return Err(ValidationError::new("username_too_long"));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::new("username_invalid_characters"));
        }
        if !username.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::new("username_must_start_with_letter"));
        }
        Ok(())
    }

    /// Validates a phone number: digits plus the usual separators.
    pub fn valid_phone(phone: &str) -> Result<(), ValidationError> {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        if digits < 3 {
            return Err(ValidationError::new("phone_too_short"));
        }
        if !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.'))
        {
            return Err(ValidationError::new("phone_invalid_characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(custom(function = "valid_username"))]
        username: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_username() {
        assert!(valid_username("alice").is_ok());
        assert!(valid_username("john_doe").is_ok());
        assert!(valid_username("john-doe").is_ok());
        assert!(valid_username("ab").is_err());
        assert!(valid_username("123abc").is_err());
        assert!(valid_username("alice@x.com").is_err());
    }

    #[test]
    fn test_valid_phone() {
        assert!(valid_phone("+380 (67) 123-45-67").is_ok());
        assert!(valid_phone("555.0100").is_ok());
        assert!(valid_phone("12").is_err());
        assert!(valid_phone("call me").is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let signup = Signup {
            username: "1x".to_string(),
            email: "nope".to_string(),
        };
        match signup.validate_request().unwrap_err() {
            RolodexError::Validation(msg) => {
                assert!(msg.contains("username"));
                assert!(msg.contains("email: Invalid email format"));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_request_passes() {
        let signup = Signup {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
        };
        assert!(signup.validate_request().is_ok());
    }
}
