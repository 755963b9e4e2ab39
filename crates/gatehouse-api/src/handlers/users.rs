//! User handlers

use axum::{extract::State, Json};
use gatehouse_service::{dto::UserResponse, AuthService};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Public profile of the authenticated caller
///
/// GET /users/me, GET /auth/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = AuthService::new(state.service_context())
        .get_signed_user(&auth.0)
        .await?;
    Ok(Json(user))
}
