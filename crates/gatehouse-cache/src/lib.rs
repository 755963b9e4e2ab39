//! # gatehouse-cache
//!
//! Redis caching layer backing the cache-aside read paths for sessions and
//! users.
//!
//! ## Example
//!
//! ```ignore
//! use gatehouse_cache::{create_shared_pool, RedisCacheStore, RedisPoolConfig};
//!
//! let pool = create_shared_pool(RedisPoolConfig::default())?;
//! let cache = RedisCacheStore::new(pool);
//! cache.set("user:user_1", "{...}", Duration::from_secs(1800)).await?;
//! ```

pub mod pool;
pub mod store;

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export store types
pub use store::{RedisCacheStore, DEFAULT_KEY_PREFIX};
