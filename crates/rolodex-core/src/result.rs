//! Result type alias for Rolodex operations.

use crate::RolodexError;

/// A specialized Result type for Rolodex operations.
pub type RolodexResult<T> = Result<T, RolodexError>;
