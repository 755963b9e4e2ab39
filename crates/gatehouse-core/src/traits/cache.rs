//! Cache port
//!
//! Reads are tri-state: `Ok(Some(_))` is a hit, `Ok(None)` a miss and `Err`
//! a cache-layer failure. Callers treat miss and failure the same way and
//! fall through to the repository.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DomainError;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a raw value
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a raw value with a time-to-live
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
