//! Authentication handlers
//!
//! Registration, password and one-time code login, activation, token
//! refresh, logout and session listing.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{headers::UserAgent, TypedHeader};
use gatehouse_service::{
    dto::{
        LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, SessionResponse,
        UserResponse, VerifyCodeRequest, VerifyResponse,
    },
    AuthService,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = AuthService::new(state.service_context());
    let user = service.register(request).await?;
    Ok(Created(Json(user)))
}

/// Log in with a password, or request a one-time code when none is given
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    user_agent: Option<TypedHeader<UserAgent>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    let service = AuthService::new(state.service_context());

    let Some(password) = request.password else {
        service.request_code(&request.email).await?;
        return Ok(NoContent.into_response());
    };

    let agent = user_agent
        .map(|TypedHeader(agent)| agent.as_str().to_string())
        .unwrap_or_default();
    let response = service
        .login(&request.email, &password, &addr.ip().to_string(), &agent)
        .await?;

    Ok(Json(response).into_response())
}

/// Activate a pending account from the emailed link
///
/// GET /auth/activate/:user_id
pub async fn activate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<NoContent> {
    AuthService::new(state.service_context())
        .activate(&user_id)
        .await?;
    Ok(NoContent)
}

/// Exchange a one-time code for an access token
///
/// POST /auth/code/:user_id
pub async fn verify_code(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<VerifyCodeRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let response = AuthService::new(state.service_context())
        .verify(&user_id, &request.code)
        .await?;
    Ok(Json(response))
}

/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let response = AuthService::new(state.service_context())
        .refresh(request)
        .await?;
    Ok(Json(response))
}

/// Deactivate the caller's current session
///
/// PATCH /auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    AuthService::new(state.service_context())
        .logout(&auth.0)
        .await?;
    Ok(NoContent)
}

/// GET /auth/session
pub async fn current_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SessionResponse>> {
    let session = AuthService::new(state.service_context())
        .current_session(&auth.0)
        .await?;
    Ok(Json(session))
}

/// GET /auth/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = AuthService::new(state.service_context())
        .list_sessions(&auth.0)
        .await?;
    Ok(Json(sessions))
}
