//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::SECRET_KEY_SIZE;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub mail: MailConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Deadline applied to every repository call
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Cache time-to-live settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_session_cache_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_user_cache_ttl")]
    pub user_ttl_secs: u64,
}

impl CacheConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_secs)
    }
}

/// Per-client rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

/// Outbound mail configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Resend API key. Without one, messages are only logged.
    pub api_key: Option<String>,
    #[serde(default = "default_mail_sender")]
    pub sender: String,
    /// Public base URL used to build links inside messages
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default = "default_mail_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_mail_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_mail_timeout_ms")]
    pub timeout_ms: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "gatehouse".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_session_cache_ttl() -> u64 {
    900
}

fn default_user_cache_ttl() -> u64 {
    1800
}

fn default_requests_per_second() -> u32 {
    2
}

fn default_burst() -> u32 {
    4
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_idle_timeout() -> u64 {
    180
}

fn default_mail_sender() -> String {
    "Gatehouse <no-reply@gatehouse.local>".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_mail_max_attempts() -> u32 {
    3
}

fn default_mail_retry_delay_ms() -> u64 {
    500
}

fn default_mail_timeout_ms() -> u64 {
    5000
}

/// Parse an optional variable, falling back to a default when unset
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: fn() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = &lookup;

        let jwt_secret = required(lookup, "JWT_SECRET")?;
        if jwt_secret.len() != SECRET_KEY_SIZE {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("expected {SECRET_KEY_SIZE} bytes, got {}", jwt_secret.len()),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or(lookup, "APP_ENV", default_env)?,
            },
            server: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_or(lookup, "API_PORT", default_port)?,
                request_timeout_secs: parse_or(
                    lookup,
                    "API_REQUEST_TIMEOUT_SECS",
                    default_request_timeout_secs,
                )?,
            },
            database: DatabaseConfig {
                url: required(lookup, "DATABASE_URL")?,
                max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                query_timeout_ms: parse_or(lookup, "DATABASE_QUERY_TIMEOUT_MS", default_query_timeout_ms)?,
            },
            redis: RedisConfig {
                url: required(lookup, "REDIS_URL")?,
                max_connections: parse_or(
                    lookup,
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections,
                )?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: parse_or(
                    lookup,
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry,
                )?,
                refresh_token_expiry: parse_or(
                    lookup,
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    default_refresh_token_expiry,
                )?,
            },
            cache: CacheConfig {
                session_ttl_secs: parse_or(lookup, "CACHE_SESSION_TTL_SECS", default_session_cache_ttl)?,
                user_ttl_secs: parse_or(lookup, "CACHE_USER_TTL_SECS", default_user_cache_ttl)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_or(
                    lookup,
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                )?,
                burst: parse_or(lookup, "RATE_LIMIT_BURST", default_burst)?,
                sweep_interval_secs: parse_or(
                    lookup,
                    "RATE_LIMIT_SWEEP_INTERVAL_SECS",
                    default_sweep_interval,
                )?,
                idle_timeout_secs: parse_or(lookup, "RATE_LIMIT_IDLE_TIMEOUT_SECS", default_idle_timeout)?,
            },
            mail: MailConfig {
                api_key: lookup("MAIL_API_KEY").filter(|v| !v.is_empty()),
                sender: lookup("MAIL_SENDER").unwrap_or_else(default_mail_sender),
                public_url: lookup("PUBLIC_URL").unwrap_or_else(default_public_url),
                max_attempts: parse_or(lookup, "MAIL_MAX_ATTEMPTS", default_mail_max_attempts)?,
                retry_delay_ms: parse_or(lookup, "MAIL_RETRY_DELAY_MS", default_mail_retry_delay_ms)?,
                timeout_ms: parse_or(lookup, "MAIL_TIMEOUT_MS", default_mail_timeout_ms)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
