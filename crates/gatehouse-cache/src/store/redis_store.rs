//! Redis-backed [`CacheStore`]
//!
//! Keys are namespaced with a prefix so several services can share one
//! Redis database.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use gatehouse_core::error::DomainError;
use gatehouse_core::traits::CacheStore;

use crate::pool::{RedisPoolError, SharedRedisPool};

/// Namespace prepended to every key
pub const DEFAULT_KEY_PREFIX: &str = "gatehouse:";

/// Cache store backed by the shared Redis pool
#[derive(Debug, Clone)]
pub struct RedisCacheStore {
    pool: SharedRedisPool,
    prefix: String,
}

impl RedisCacheStore {
    pub fn new(pool: SharedRedisPool) -> Self {
        Self::with_prefix(pool, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(pool: SharedRedisPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

fn cache_error(e: RedisPoolError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let value = self
            .pool
            .get_string(&self.key(key))
            .await
            .map_err(cache_error)?;
        debug!(key, hit = value.is_some(), "Cache lookup");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.pool
            .set_ex(&self.key(key), value, ttl)
            .await
            .map_err(cache_error)?;
        debug!(key, ttl_secs = ttl.as_secs(), "Cache entry stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.pool
            .delete(&self.key(key))
            .await
            .map_err(cache_error)?;
        debug!(key, "Cache entry evicted");
        Ok(())
    }
}
