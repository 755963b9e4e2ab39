//! # gatehouse-common
//!
//! Shared utilities including configuration, the fault taxonomy, token and
//! password handling, mail delivery, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    check_password_strength, hash_password, verify_password, Claims, TokenError, TokenPair,
    TokenService, TokenType, SECRET_KEY_SIZE,
};
pub use config::{
    AppConfig, AppSettings, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, MailConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use error::{tag_of, ErrorResponse, Fault, FaultResult, FieldError, Tag};
pub use mail::{LogTransport, MailError, MailMessage, MailTransport, Mailer, ResendTransport, RetryPolicy};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
