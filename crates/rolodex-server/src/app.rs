//! Application assembly.

use axum::Router;
use deadpool_redis::{Config, Pool, Runtime};
use rolodex_config::{AppConfig, RedisConfig};
use rolodex_core::{RolodexError, RolodexResult};
use rolodex_repository::{create_pool, DatabasePool, MySqlContactRepository, MySqlUserDirectory};
use rolodex_rest::{create_router, AppState};
use rolodex_security::{PasswordHasher, TokenCodec};
use rolodex_service::{
    create_dispatcher, AuthServiceImpl, ContactServiceImpl, MailOutbox, RedisCacheService,
    RedisUserCache, SessionResolver, UserServiceImpl,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Everything the server runs: the router plus the resources that must
/// be released on shutdown.
pub struct Application {
    pub router: Router,
    pub db_pool: Arc<DatabasePool>,
    pub mail_worker: JoinHandle<()>,
}

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Connects to the backing stores and wires services into the router.
    ///
    /// A database failure is fatal. Redis is optional: a disabled or
    /// unreachable cache only degrades session lookups to the database.
    pub async fn build(self) -> RolodexResult<Application> {
        let config = self.config;

        let db_pool = create_pool(&config.database).await?;
        if config.database.run_migrations {
            db_pool.run_migrations().await?;
        }

        let cache_backend = Arc::new(match create_redis_pool(&config.redis).await? {
            Some(pool) => RedisCacheService::new(Arc::new(pool)),
            None => RedisCacheService::disabled(),
        });
        let user_cache = Arc::new(RedisUserCache::new(cache_backend.clone()));

        let tokens = Arc::new(TokenCodec::new(&config.security)?);
        let hasher = Arc::new(PasswordHasher::with_cost(config.security.password_hash_cost));

        let dispatcher = create_dispatcher(&config.mail)?;
        let (outbox, mail_worker) = MailOutbox::spawn(config.mail.queue_capacity, dispatcher);

        let directory = Arc::new(MySqlUserDirectory::new(db_pool.clone()));
        let contacts = Arc::new(MySqlContactRepository::new(db_pool.clone()));

        let auth_service = Arc::new(AuthServiceImpl::new(
            directory.clone(),
            hasher,
            tokens.clone(),
            user_cache.clone(),
            outbox,
            config.server.public_url.clone(),
        ));
        let user_service = Arc::new(UserServiceImpl::new(directory.clone(), user_cache.clone()));
        let contact_service = Arc::new(ContactServiceImpl::new(contacts));
        let sessions = Arc::new(SessionResolver::new(tokens, directory, user_cache));

        let state = AppState::new(
            auth_service,
            user_service,
            contact_service,
            sessions,
            db_pool.clone(),
            cache_backend,
        );

        let router = create_router(state, &config.server, &config.rate_limit);

        Ok(Application {
            router,
            db_pool,
            mail_worker,
        })
    }
}

/// Creates the Redis pool, or `None` when caching is disabled.
///
/// An unreachable server is logged and the pool kept: connections are
/// retried lazily and cache faults never fail a request.
pub async fn create_redis_pool(config: &RedisConfig) -> RolodexResult<Option<Pool>> {
    if !config.enabled {
        info!("Redis cache disabled");
        return Ok(None);
    }

    info!("Creating Redis connection pool...");

    let pool = Config::from_url(&config.url)
        .builder()
        .map_err(|e| RolodexError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size as usize)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| RolodexError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    match pool.get().await {
        Ok(mut conn) => {
            let pong: Result<String, _> = deadpool_redis::redis::cmd("PING")
                .query_async(&mut *conn)
                .await;
            match pong {
                Ok(_) => info!("Redis connection pool created successfully"),
                Err(e) => warn!("Redis did not answer PING, continuing without it: {}", e),
            }
        }
        Err(e) => warn!("Redis unreachable at startup, continuing without it: {}", e),
    }

    Ok(Some(pool))
}
