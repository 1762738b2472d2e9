//! Application state for Axum handlers.

use rolodex_core::HealthCheck;
use rolodex_service::{AuthService, ContactService, SessionResolver, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub contact_service: Arc<dyn ContactService>,
    pub sessions: Arc<SessionResolver>,
    pub database: Arc<dyn HealthCheck>,
    pub cache: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        contact_service: Arc<dyn ContactService>,
        sessions: Arc<SessionResolver>,
        database: Arc<dyn HealthCheck>,
        cache: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            contact_service,
            sessions,
            database,
            cache,
        }
    }
}
