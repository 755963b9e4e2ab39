//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, and the pools probed by the readiness check.

use std::sync::Arc;

use gatehouse_cache::SharedRedisPool;
use gatehouse_common::{AppConfig, TokenService};
use gatehouse_db::PgPool;
use gatehouse_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    pool: PgPool,
    redis: SharedRedisPool,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: PgPool,
        redis: SharedRedisPool,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool,
            redis,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// PostgreSQL pool, used by readiness probes
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Redis pool, used by readiness probes
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis
    }

    pub fn token_service(&self) -> &TokenService {
        self.service_context.token_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("redis", &self.redis)
            .finish_non_exhaustive()
    }
}
