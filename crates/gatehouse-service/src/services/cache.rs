//! Cache-aside helpers
//!
//! A miss and a cache failure look the same to callers: both return `None`
//! and the caller reads the repository. Writes and evictions only log.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use gatehouse_core::traits::CacheStore;

pub(crate) fn session_key(user_id: &str) -> String {
    format!("sess:{user_id}")
}

pub(crate) fn user_key(user_id: &str) -> String {
    format!("user:{user_id}")
}

pub(crate) async fn read<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "Cache read failed, falling back to store");
            None
        }
    }
}

pub(crate) async fn write<T: Serialize>(cache: &dyn CacheStore, key: &str, value: &T, ttl: Duration) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "Failed to encode cache entry");
            return;
        }
    };

    if let Err(e) = cache.set(key, &raw, ttl).await {
        warn!(key, error = %e, "Cache write failed");
    }
}

pub(crate) async fn evict(cache: &dyn CacheStore, key: &str) {
    if let Err(e) = cache.delete(key).await {
        warn!(key, error = %e, "Cache eviction failed");
    }
}
