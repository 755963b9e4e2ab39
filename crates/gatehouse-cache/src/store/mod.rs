//! Cache store implementations

mod redis_store;

pub use redis_store::{RedisCacheStore, DEFAULT_KEY_PREFIX};
