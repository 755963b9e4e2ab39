//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use gatehouse_service::dto::{HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = match state.pool().acquire().await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "Readiness: PostgreSQL unavailable");
            false
        }
    };

    let redis_healthy = match state.redis_pool().health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness: Redis unavailable");
            false
        }
    };

    let response = ReadinessResponse::new(db_healthy, redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
