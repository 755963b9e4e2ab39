//! Authentication extractor
//!
//! Resolves the caller from a `Bearer` access token in the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};
use gatehouse_common::{Fault, TokenError, TokenService};
use gatehouse_service::AuthIdentity;

use crate::response::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller extracted from the access token
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthIdentity);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        self.0.user_id()
    }
}

/// Verify an Authorization header value and resolve the caller.
///
/// The scheme prefix is matched case-sensitively.
pub fn authenticate(
    header: Option<&HeaderValue>,
    tokens: &TokenService,
) -> Result<AuthIdentity, Fault> {
    let value = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(Fault::unauthorized("access token not provided")),
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty() && !token.contains(' '))
        .ok_or_else(|| Fault::unauthorized("invalid authorization header"))?;

    let claims = tokens.verify_access(token).map_err(|e| match e {
        TokenError::Expired => Fault::unauthorized("access token has expired"),
        other => {
            tracing::debug!(error = %other, "Access token rejected");
            Fault::unauthorized("invalid access token").with_source(other)
        }
    })?;

    AuthIdentity::from_claims(&claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let identity = authenticate(parts.headers.get(AUTHORIZATION), app_state.token_service())?;
        Ok(AuthUser(identity))
    }
}
