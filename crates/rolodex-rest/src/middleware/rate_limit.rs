//! Per-client request rate limiting.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use rolodex_core::{RolodexError, RolodexResult};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tracked clients above which idle buckets are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

/// Token buckets keyed by client address.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimiter {
    /// Allows each client `requests` per minute; zero is treated as one.
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(GovernorRateLimiter::keyed(quota)),
        }
    }

    /// Takes one token from `client`'s bucket or fails with
    /// [`RolodexError::RateLimitExceeded`].
    pub fn check(&self, client: IpAddr) -> RolodexResult<()> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        self.limiter
            .check_key(&client)
            .map_err(|_| RolodexError::RateLimitExceeded)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

/// Rejects with 429 once the calling client's bucket is empty.
///
/// Clients are told apart by peer address; without connection info every
/// request shares the unspecified-address bucket.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = match connect_info {
        Some(ConnectInfo(addr)) => addr.ip(),
        None => {
            debug!("No peer address on request, using shared bucket");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        }
    };

    if let Err(e) = limiter.check(client) {
        warn!(uri = %request.uri(), %client, "Rate limit exceeded");
        return AppError(e).into_response();
    }
    next.run(request).await
}
