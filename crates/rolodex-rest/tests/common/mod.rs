//! Shared setup for REST integration tests.
//!
//! Runs the full router over in-memory storage with the cache disabled.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rolodex_config::{RateLimitConfig, SecurityConfig, ServerConfig};
use rolodex_core::{HealthCheck, HealthStatus};
use rolodex_repository::{InMemoryContactRepository, InMemoryUserDirectory};
use rolodex_rest::{create_router, AppState};
use rolodex_security::{PasswordHasher, TokenCodec};
use rolodex_service::{
    AuthServiceImpl, ContactServiceImpl, LoggingMailDispatcher, MailOutbox, RedisCacheService,
    RedisUserCache, SessionResolver, UserServiceImpl,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "rest-test-secret-that-is-long-enough";

/// Health check with a fixed answer.
pub struct FixedHealth(pub HealthStatus);

#[async_trait]
impl HealthCheck for FixedHealth {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn check(&self) -> HealthStatus {
        self.0.clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<TokenCodec>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(HealthStatus::Healthy, RateLimitConfig::default())
    }

    pub fn with_database(status: HealthStatus) -> Self {
        Self::build(status, RateLimitConfig::default())
    }

    pub fn with_rate_limit(requests_per_minute: u32) -> Self {
        Self::build(
            HealthStatus::Healthy,
            RateLimitConfig {
                enabled: true,
                me_requests_per_minute: requests_per_minute,
            },
        )
    }

    fn build(database: HealthStatus, rate_limit: RateLimitConfig) -> Self {
        let tokens = Arc::new(
            TokenCodec::new(&SecurityConfig {
                jwt_secret: TEST_SECRET.to_string(),
                ..SecurityConfig::default()
            })
            .expect("token codec"),
        );

        let directory = Arc::new(InMemoryUserDirectory::new());
        let contacts = Arc::new(InMemoryContactRepository::new());
        let cache_backend = Arc::new(RedisCacheService::disabled());
        let cache = Arc::new(RedisUserCache::new(cache_backend.clone()));
        let (outbox, _worker) = MailOutbox::spawn(16, Arc::new(LoggingMailDispatcher));

        let auth_service = Arc::new(AuthServiceImpl::new(
            directory.clone(),
            Arc::new(PasswordHasher::with_cost(1)),
            tokens.clone(),
            cache.clone(),
            outbox,
            "http://localhost:8080",
        ));
        let user_service = Arc::new(UserServiceImpl::new(directory.clone(), cache.clone()));
        let contact_service = Arc::new(ContactServiceImpl::new(contacts));
        let sessions = Arc::new(SessionResolver::new(tokens.clone(), directory, cache));

        let state = AppState::new(
            auth_service,
            user_service,
            contact_service,
            sessions,
            Arc::new(FixedHealth(database)),
            cache_backend,
        );

        Self {
            router: create_router(state, &ServerConfig::default(), &rate_limit),
            tokens,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(with_token(Request::get(uri), token).body(Body::empty()).unwrap())
            .await
    }

    /// GET as if sent over a connection from `peer`.
    pub async fn get_from(
        &self,
        uri: &str,
        token: Option<&str>,
        peer: SocketAddr,
    ) -> (StatusCode, Value) {
        let mut request = with_token(Request::get(uri), token)
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        self.send(request).await
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = with_token(Request::builder().method(method).uri(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap();
        self.send(request).await
    }

    /// Registers, confirms and logs in; returns the access token.
    pub async fn signed_in(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let (status, _) = self
            .json(
                "POST",
                "/api/auth/register",
                None,
                serde_json::json!({ "username": username, "email": email, "password": "secret1" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let token = self.tokens.issue_confirmation(&email).unwrap();
        let (status, _) = self
            .get(&format!("/api/auth/confirmed_email/{token}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.login(username, "secret1").await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["access_token"].as_str().unwrap().to_string()
    }
}

fn with_token(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}
