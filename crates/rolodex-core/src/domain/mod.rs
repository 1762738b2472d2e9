//! Domain entities and value objects.

pub mod contact;
pub mod email;
pub mod user;

pub use contact::*;
pub use email::*;
pub use user::*;
