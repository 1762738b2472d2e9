//! Health check controller.

use crate::{responses::ApiResponse, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use rolodex_core::ErrorResponse;
use rolodex_service::MessageResponse;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Readiness of each dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
    pub cache: String,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/healthchecker", get(healthchecker))
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

/// Database round trip.
#[utoipa::path(
    get,
    path = "/api/healthchecker",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = MessageResponse),
        (status = 500, description = "Error connecting to the database")
    )
)]
pub async fn healthchecker(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.database.check().await;
    if status.is_healthy() {
        return (
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponse::new("Rolodex is healthy"))),
        )
            .into_response();
    }

    error!("Health check failed: {:?}", status);
    let body = ApiResponse::<()>::error(ErrorResponse {
        code: "DATABASE_ERROR".to_string(),
        message: "Error connecting to the database".to_string(),
        details: None,
        trace_id: None,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness check endpoint.
///
/// A disabled or degraded cache does not make the service unready.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.database.check().await;
    let cache = state.cache.check().await;

    let ready = database.is_healthy() && !cache.is_unhealthy();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        database: database.label().to_string(),
        cache: cache.label().to_string(),
    };
    (status, Json(body))
}
