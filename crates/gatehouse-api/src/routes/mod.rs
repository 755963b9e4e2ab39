//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes stay at the root.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{auth, health, users};
use crate::state::AppState;

/// Create the API router (excluding health, which bypasses rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/activate/:user_id", get(auth::activate))
        .route("/auth/code/:user_id", post(auth::verify_code))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", patch(auth::logout))
        .route("/auth/me", get(users::get_current_user))
        .route("/auth/session", get(auth::current_session))
        .route("/auth/sessions", get(auth::list_sessions))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(users::get_current_user))
}
