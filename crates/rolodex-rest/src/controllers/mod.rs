//! REST API controllers.

pub mod auth_controller;
pub mod contact_controller;
pub mod health_controller;
pub mod user_controller;
