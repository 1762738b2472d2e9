//! # Rolodex Service
//!
//! Business logic for Rolodex: registration and email confirmation, login,
//! session resolution through the user cache, and owner-scoped contacts.

pub mod auth_service;
pub mod cache;
pub mod contact_service;
pub mod dto;
pub mod mail;
pub mod session_resolver;
pub mod user_service;

#[cfg(test)]
mod test_support;

pub use auth_service::*;
pub use cache::*;
pub use contact_service::*;
pub use dto::*;
pub use mail::*;
pub use session_resolver::*;
pub use user_service::*;
