//! JWT claims structure.

use serde::{Deserialize, Serialize};

/// Claims carried by access and confirmation tokens.
///
/// Access tokens carry the username as subject; confirmation tokens carry
/// the email address and also an issued-at time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration timestamp (seconds since the epoch).
    pub exp: i64,

    /// Issued at timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Returns the subject if present and non-empty.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }
}
