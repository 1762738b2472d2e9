//! MySQL implementations.

mod contact_repository;
mod user_directory;

pub use contact_repository::*;
pub use user_directory::*;
