//! Authentication service
//!
//! Composes the user, code, and session services with the token service
//! into the user-facing flows: register, login, passwordless login,
//! activation, logout, and token refresh.

use gatehouse_common::{verify_password, Fault, FaultResult};
use gatehouse_core::entities::User;
use tracing::{error, info, instrument, warn};

use crate::dto::{
    LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest, SessionResponse,
    UserResponse, VerifyResponse,
};

use super::cache;
use super::code::CodeService;
use super::context::ServiceContext;
use super::identity::AuthIdentity;
use super::session::SessionService;
use super::user::UserService;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and mail its activation link
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> FaultResult<UserResponse> {
        let user = UserService::new(self.ctx).create_user(request).await?;

        self.ctx
            .mailer()
            .send_activation(&user.email, &user.name, &user.id)
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(UserResponse::from(&user))
    }

    /// Password login.
    ///
    /// Prior sessions are deactivated before the new one is created, so a
    /// user holds a single active session.
    #[instrument(skip(self, password, agent))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip: &str,
        agent: &str,
    ) -> FaultResult<LoginResponse> {
        let user = UserService::new(self.ctx).get_user_by_email(email).await?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(&user.id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve password hash");
                Fault::bad_request("failed to get user by email").with_source(e)
            })?;

        let matches = match password_hash {
            Some(hash) => verify_password(password, &hash)?,
            None => false,
        };
        if !matches {
            warn!(user_id = %user.id, "Login failed: invalid credentials");
            return Err(Fault::unauthorized("invalid credentials"));
        }

        ensure_can_sign_in(&user)?;

        let sessions = SessionService::new(self.ctx);
        sessions.deactivate_all(&user.id).await?;

        let tokens = self
            .ctx
            .token_service()
            .issue_pair(&user.id)
            .map_err(|e| Fault::internal("failed to sign tokens").with_source(e))?;

        let session = sessions
            .create_session(&user.id, ip, agent, &tokens.refresh_token)
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "User logged in");
        Ok(LoginResponse {
            session_id: session.id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Start a passwordless login by mailing a one-time code
    #[instrument(skip(self))]
    pub async fn request_code(&self, email: &str) -> FaultResult<()> {
        let user = UserService::new(self.ctx).get_user_by_email(email).await?;

        ensure_can_sign_in(&user)?;

        let code = CodeService::new(self.ctx).create_code(&user.id).await?;

        self.ctx
            .mailer()
            .send_code(&user.email, &user.name, &code.code)
            .await?;

        info!(user_id = %user.id, "Login code sent");
        Ok(())
    }

    /// Finish a passwordless login
    #[instrument(skip(self, code))]
    pub async fn verify(&self, user_id: &str, code: &str) -> FaultResult<VerifyResponse> {
        let user = UserService::new(self.ctx).get_user_by_id(user_id).await?;

        // Checked before the code so a refused account keeps its attempts
        ensure_can_sign_in(&user)?;

        let valid = CodeService::new(self.ctx)
            .verify_code(&user.id, code)
            .await?;
        if !valid {
            return Err(Fault::conflict("incorrect otp code"));
        }

        let access_token = self
            .ctx
            .token_service()
            .issue_access_token(&user.id)
            .map_err(|e| Fault::internal("failed to sign access token").with_source(e))?;

        info!(user_id = %user.id, "One-time code login succeeded");
        Ok(VerifyResponse {
            user_id: user.id,
            access_token,
        })
    }

    /// Enable a pending account. Links are single-use.
    #[instrument(skip(self))]
    pub async fn activate(&self, user_id: &str) -> FaultResult<()> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve user by id");
                Fault::bad_request("failed to get user by id").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("user not found"))?;

        if user.is_enabled() {
            return Err(Fault::expired("expired activation link"));
        }

        user.enable();

        self.ctx.user_repo().update(&user).await.map_err(|e| {
            error!(error = %e, "Failed to enable user");
            Fault::bad_request("failed to update user").with_source(e)
        })?;

        cache::evict(self.ctx.cache(), &cache::user_key(&user.id)).await;

        info!(user_id = %user.id, "User activated");
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = %identity.user_id()))]
    pub async fn logout(&self, identity: &AuthIdentity) -> FaultResult<()> {
        SessionService::new(self.ctx)
            .deactivate_current(identity.user_id())
            .await
    }

    /// Public profile of the caller, cached under `user:{id}`
    #[instrument(skip_all, fields(user_id = %identity.user_id()))]
    pub async fn get_signed_user(&self, identity: &AuthIdentity) -> FaultResult<UserResponse> {
        let key = cache::user_key(identity.user_id());

        if let Some(user) = cache::read::<UserResponse>(self.ctx.cache(), &key).await {
            return Ok(user);
        }

        let user = UserService::new(self.ctx)
            .get_user_by_id(identity.user_id())
            .await?;
        let response = UserResponse::from(&user);

        cache::write(
            self.ctx.cache(),
            &key,
            &response,
            self.ctx.cache_settings().user_ttl,
        )
        .await;

        Ok(response)
    }

    #[instrument(skip_all)]
    pub async fn refresh(&self, request: RefreshRequest) -> FaultResult<RefreshResponse> {
        let access_token = SessionService::new(self.ctx)
            .renew_access_token(&request.refresh_token)
            .await?;
        Ok(RefreshResponse { access_token })
    }

    /// The caller's active session
    #[instrument(skip_all, fields(user_id = %identity.user_id()))]
    pub async fn current_session(&self, identity: &AuthIdentity) -> FaultResult<SessionResponse> {
        let session = SessionService::new(self.ctx)
            .get_session_by_user_id(identity.user_id())
            .await?;
        Ok(SessionResponse::from(&session))
    }

    #[instrument(skip_all, fields(user_id = %identity.user_id()))]
    pub async fn list_sessions(&self, identity: &AuthIdentity) -> FaultResult<Vec<SessionResponse>> {
        let sessions = SessionService::new(self.ctx)
            .list_sessions(identity.user_id())
            .await?;
        Ok(sessions.iter().map(SessionResponse::from).collect())
    }
}

/// Account flags shared by password and one-time code sign-in
fn ensure_can_sign_in(user: &User) -> FaultResult<()> {
    if user.is_locked() {
        warn!(user_id = %user.id, "Sign-in rejected: user is locked");
        return Err(Fault::locked_user("user is locked"));
    }
    if !user.is_enabled() {
        return Err(Fault::disabled_user("user must enable account to login"));
    }
    Ok(())
}
