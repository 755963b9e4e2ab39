//! Per-client rate limiting
//!
//! Every client IP gets its own token bucket. Entries idle longer than the
//! configured timeout are evicted by a background sweeper.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatehouse_common::{Fault, RateLimitConfig};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::response::ApiError;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct Client {
    limiter: DirectLimiter,
    last_seen: Instant,
}

struct Inner {
    clients: Mutex<HashMap<IpAddr, Client>>,
    quota: Quota,
    idle_timeout: Duration,
    sweep_interval: Duration,
}

/// Registry of per-IP limiters, cheap to clone
#[derive(Clone)]
pub struct ClientRateLimiter {
    inner: Arc<Inner>,
}

impl ClientRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(per_second);

        Self {
            inner: Arc::new(Inner {
                clients: Mutex::new(HashMap::new()),
                quota: Quota::per_second(per_second).allow_burst(burst),
                idle_timeout: Duration::from_secs(config.idle_timeout_secs),
                sweep_interval: Duration::from_secs(config.sweep_interval_secs.max(1)),
            }),
        }
    }

    /// Record a request from `ip`; `false` when it exceeds the quota
    pub fn check(&self, ip: IpAddr) -> bool {
        let mut clients = self.inner.clients.lock();
        let client = clients.entry(ip).or_insert_with(|| Client {
            limiter: RateLimiter::direct(self.inner.quota),
            last_seen: Instant::now(),
        });
        client.last_seen = Instant::now();
        client.limiter.check().is_ok()
    }

    /// Drop clients idle longer than the idle timeout, returning how many
    pub fn sweep(&self) -> usize {
        let mut clients = self.inner.clients.lock();
        let before = clients.len();
        let idle_timeout = self.inner.idle_timeout;
        clients.retain(|_, client| client.last_seen.elapsed() <= idle_timeout);
        before - clients.len()
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.inner.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run [`sweep`](Self::sweep) periodically until `shutdown` is cancelled
    pub fn spawn_sweeper(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(registry.inner.sweep_interval);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = shutdown.cancelled() => {
                        info!("Rate limiter sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = registry.sweep();
                        if evicted > 0 {
                            debug!(evicted, remaining = registry.len(), "Evicted idle clients");
                        }
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for ClientRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRateLimiter")
            .field("clients", &self.len())
            .field("idle_timeout", &self.inner.idle_timeout)
            .finish_non_exhaustive()
    }
}

/// Reject requests over the caller's quota with 429 before any handler runs
pub async fn rate_limit(
    State(limiter): State<ClientRateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.check(addr.ip()) {
        warn!(ip = %addr.ip(), path = %request.uri().path(), "Rate limit exceeded");
        return ApiError::from(Fault::too_many_requests("too many requests")).into_response();
    }
    next.run(request).await
}
