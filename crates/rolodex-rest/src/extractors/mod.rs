//! Custom Axum extractors.

mod current_user;
mod validated;

pub use current_user::*;
pub use validated::*;
