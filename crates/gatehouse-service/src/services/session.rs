//! Session lifecycle service
//!
//! Sessions are the source of truth for refresh tokens. The cache entry
//! under `sess:{user_id}` only speeds up reads and is re-checked for expiry.

use gatehouse_common::{Fault, FaultResult, TokenError};
use gatehouse_core::entities::Session;
use tracing::{error, info, instrument, warn};

use super::cache;
use super::context::ServiceContext;

/// Session lifecycle service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a new session for a freshly issued refresh token
    #[instrument(skip(self, raw_agent, refresh_token))]
    pub async fn create_session(
        &self,
        user_id: &str,
        ip: &str,
        raw_agent: &str,
        refresh_token: &str,
    ) -> FaultResult<Session> {
        let lifetime = self.ctx.token_service().refresh_ttl();
        let session = Session::new(user_id, ip, raw_agent, refresh_token, lifetime);

        self.ctx.session_repo().insert(&session).await.map_err(|e| {
            if e.is_conflict() {
                warn!("Concurrent login already holds the active session");
                Fault::conflict("another login is in progress").with_source(e)
            } else {
                error!(error = %e, "Failed to insert session");
                Fault::bad_request("failed to insert session").with_source(e)
            }
        })?;

        cache::write(
            self.ctx.cache(),
            &cache::session_key(user_id),
            &session,
            self.ctx.cache_settings().session_ttl,
        )
        .await;

        info!(session_id = %session.id, agent = %session.agent, "Session created");
        Ok(session)
    }

    /// Mint a new access token from a session's refresh token
    #[instrument(skip_all)]
    pub async fn renew_access_token(&self, refresh_token: &str) -> FaultResult<String> {
        let claims = self
            .ctx
            .token_service()
            .verify_refresh(refresh_token)
            .map_err(|e| match e {
                TokenError::Expired => Fault::unauthorized("refresh token has expired"),
                other => Fault::unauthorized("invalid refresh token").with_source(other),
            })?;

        let session = self
            .ctx
            .session_repo()
            .find_by_refresh_token(refresh_token)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve session by refresh token");
                Fault::bad_request("failed to retrieve session").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("session not found"))?;

        if !session.is_usable() {
            let reason = if session.active {
                "session has expired"
            } else {
                "session is no longer active"
            };
            return Err(Fault::unauthorized(reason));
        }
        if !session.is_owned_by(claims.user_id()) {
            warn!(
                session_id = %session.id,
                token_subject = %claims.user_id(),
                "Refresh token subject does not own the session"
            );
            return Err(Fault::unauthorized("session does not belong to token subject"));
        }

        let access_token = self
            .ctx
            .token_service()
            .issue_access_token(&session.user_id)
            .map_err(|e| Fault::internal("failed to sign access token").with_source(e))?;

        info!(session_id = %session.id, user_id = %session.user_id, "Access token renewed");
        Ok(access_token)
    }

    /// Active session of a user, served from cache when possible
    #[instrument(skip(self))]
    pub async fn get_session_by_user_id(&self, user_id: &str) -> FaultResult<Session> {
        let key = cache::session_key(user_id);

        if let Some(session) = cache::read::<Session>(self.ctx.cache(), &key).await {
            if session.is_expired() {
                return Err(Fault::unauthorized("session has expired"));
            }
            return Ok(session);
        }

        let session = self
            .ctx
            .session_repo()
            .find_active_by_user(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve active session");
                Fault::bad_request("failed to retrieve session").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("active session not found"))?;

        if session.is_expired() {
            return Err(Fault::unauthorized("session has expired"));
        }

        cache::write(
            self.ctx.cache(),
            &key,
            &session,
            self.ctx.cache_settings().session_ttl,
        )
        .await;

        Ok(session)
    }

    /// Deactivate the user's current session and evict it from the cache
    #[instrument(skip(self))]
    pub async fn deactivate_current(&self, user_id: &str) -> FaultResult<()> {
        let mut session = self
            .ctx
            .session_repo()
            .find_active_by_user(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve active session");
                Fault::bad_request("failed to retrieve active session").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("active session not found"))?;

        session.deactivate();

        self.ctx.session_repo().update(&session).await.map_err(|e| {
            error!(error = %e, session_id = %session.id, "Failed to deactivate session");
            Fault::bad_request("failed to deactivate session").with_source(e)
        })?;

        cache::evict(self.ctx.cache(), &cache::session_key(user_id)).await;

        info!(session_id = %session.id, "Session deactivated");
        Ok(())
    }

    /// Deactivate every session of a user
    #[instrument(skip(self))]
    pub async fn deactivate_all(&self, user_id: &str) -> FaultResult<()> {
        self.ctx
            .session_repo()
            .deactivate_all(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to deactivate sessions");
                Fault::bad_request("failed to deactivate user sessions").with_source(e)
            })?;

        cache::evict(self.ctx.cache(), &cache::session_key(user_id)).await;
        Ok(())
    }

    /// Every session of a user, newest first
    #[instrument(skip(self))]
    pub async fn list_sessions(&self, user_id: &str) -> FaultResult<Vec<Session>> {
        self.ctx
            .session_repo()
            .find_all_by_user(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list sessions");
                Fault::bad_request("failed to retrieve sessions").with_source(e)
            })
    }
}
