//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, MailConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
