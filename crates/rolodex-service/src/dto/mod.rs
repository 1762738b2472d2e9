//! Data Transfer Objects (DTOs).

mod auth_dto;
mod contact_dto;
mod user_dto;

pub use auth_dto::*;
pub use contact_dto::*;
pub use user_dto::*;
