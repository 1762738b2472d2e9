//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

/// Client-facing message for a storage-level unique violation.
pub const DUPLICATE_ENTRY: &str = "Account already exists";

/// Unified error type for all layers of Rolodex.
///
/// Authentication failures deliberately collapse into a single
/// [`RolodexError::Unauthenticated`] variant so callers cannot tell which
/// check rejected a request. Cache faults are carried by
/// [`RolodexError::Cache`] and are never meant to reach a client.
#[derive(Error, Debug)]
pub enum RolodexError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (duplicate username or email)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Authentication Errors ============
    /// Missing, invalid or expired credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// Email confirmation could not be verified
    #[error("Verification error: {0}")]
    VerificationError(String),

    /// Token signature, format or expiry check failed
    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but carries no subject claim
    #[error("Token has no subject")]
    MissingSubject,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External service error
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RolodexError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::VerificationError(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthenticated(_) | Self::InvalidToken | Self::MissingSubject => 401,
            Self::RateLimitExceeded => 429,
            Self::ExternalService { .. } => 502,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::VerificationError(_) => "VERIFICATION_ERROR",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::MissingSubject => "MISSING_SUBJECT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthenticated error.
    #[must_use]
    pub fn unauthenticated<T: Into<String>>(message: T) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Creates a verification error.
    #[must_use]
    pub fn verification<T: Into<String>>(message: T) -> Self {
        Self::VerificationError(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Conflict for a unique-key violation reported by the database.
    ///
    /// The driver text names tables and keys, so it is only logged.
    pub fn duplicate_entry(detail: &str) -> Self {
        debug!("Unique constraint violation: {}", detail);
        Self::Conflict(DUPLICATE_ENTRY.to_string())
    }

    /// Returns true for errors the client may see unchanged.
    ///
    /// Infrastructure errors are logged server-side and replaced by a
    /// generic message in responses.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RolodexError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                let duplicate = db_err.is_unique_violation()
                    || matches!(db_err.code().as_deref(), Some("23505" | "1062"));
                if duplicate {
                    return Self::duplicate_entry(db_err.message());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RolodexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `RolodexError`.
    ///
    /// Server-side failures get a generic message so that database or
    /// cache details never leak to clients.
    #[must_use]
    pub fn from_error(error: &RolodexError) -> Self {
        let message = if error.is_client_error() {
            error.to_string()
        } else {
            "Internal server error".to_string()
        };
        Self {
            code: error.error_code().to_string(),
            message,
            details: None,
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&RolodexError> for ErrorResponse {
    fn from(error: &RolodexError) -> Self {
        Self::from_error(error)
    }
}
