//! Server setup and initialization
//!
//! Wires pools, repositories and services into [`AppState`], builds the
//! router, and serves it until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use gatehouse_cache::{create_shared_pool, RedisCacheStore, RedisPoolConfig, RedisPoolError};
use gatehouse_common::{
    AppConfig, Fault, LogTransport, MailTransport, Mailer, ResendTransport, RetryPolicy,
    TokenError, TokenService,
};
use gatehouse_db::{
    create_pool, run_migrations, PgCodeRepository, PgSessionRepository, PgUserRepository,
    PoolConfig,
};
use gatehouse_service::{CacheSettings, ServiceContext};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::middleware::{apply_middleware, rate_limit, ClientRateLimiter};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Failures while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("database error: {0}")]
    Database(String),

    #[error("cache error: {0}")]
    Cache(#[from] RedisPoolError),

    #[error("token service error: {0}")]
    Token(#[from] TokenError),

    #[error("invalid service wiring: {0}")]
    Wiring(#[from] Fault),

    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState, limiter: ClientRateLimiter) -> Router {
    let api = create_router().layer(axum::middleware::from_fn_with_state(limiter, rate_limit));
    let router = api.merge(health_routes());
    let router = apply_middleware(router, state.config());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, ServerError> {
    info!("Connecting to PostgreSQL...");
    let pool_config = PoolConfig::from(&config.database);
    let pool = create_pool(&pool_config)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis = create_shared_pool(RedisPoolConfig::from(&config.redis))?;
    info!("Redis pool created");

    let token_service = Arc::new(TokenService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    )?);

    let transport: Arc<dyn MailTransport> = match &config.mail.api_key {
        Some(api_key) => Arc::new(ResendTransport::new(api_key.clone())),
        None => {
            warn!("MAIL_API_KEY not set; emails will only be logged");
            Arc::new(LogTransport)
        }
    };
    let mailer = Mailer::new(
        transport,
        config.mail.sender.clone(),
        config.mail.public_url.clone(),
        RetryPolicy::from(&config.mail),
    );

    let deadline = config.database.query_timeout();
    let service_context = ServiceContext::builder()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone(), deadline)))
        .code_repo(Arc::new(PgCodeRepository::new(pool.clone(), deadline)))
        .session_repo(Arc::new(PgSessionRepository::new(pool.clone(), deadline)))
        .cache(Arc::new(RedisCacheStore::new(redis.clone())))
        .cache_settings(CacheSettings::from(&config.cache))
        .mailer(mailer)
        .token_service(token_service)
        .build()?;

    Ok(AppState::new(service_context, config, pool, redis))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let address = config.server.address();
    let limiter = ClientRateLimiter::new(&config.rate_limit);

    let state = create_app_state(config).await?;
    let app = create_app(state, limiter.clone());

    let shutdown = CancellationToken::new();
    let sweeper = limiter.spawn_sweeper(shutdown.clone());

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server listening on http://{}", address);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
    .await;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Rate limiter sweeper ended abnormally");
    }

    served.map_err(ServerError::Serve)?;
    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C, SIGTERM or cancellation, then cancel `shutdown`
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
        () = shutdown.cancelled() => info!("Shutdown requested"),
    }

    shutdown.cancel();
}
