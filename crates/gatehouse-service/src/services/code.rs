//! One-time code service
//!
//! Creates and verifies the numeric codes behind passwordless login.

use gatehouse_common::{Fault, FaultResult};
use gatehouse_core::entities::OneTimeCode;
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;

/// One-time code service
pub struct CodeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CodeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replace the user's active code with a fresh one.
    ///
    /// Earlier active codes are deactivated first, so at most one code per
    /// user can be verified at any time.
    #[instrument(skip(self))]
    pub async fn create_code(&self, user_id: &str) -> FaultResult<OneTimeCode> {
        self.ctx
            .code_repo()
            .deactivate_all(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to deactivate previous codes");
                Fault::bad_request("failed to create code").with_source(e)
            })?;

        let code = OneTimeCode::new(user_id);

        self.ctx.code_repo().insert(&code).await.map_err(|e| {
            if e.is_conflict() {
                warn!("Concurrent code request already holds the active slot");
                Fault::conflict("a code request is already in progress").with_source(e)
            } else {
                error!(error = %e, "Failed to insert code");
                Fault::bad_request("failed to create otp code").with_source(e)
            }
        })?;

        info!(code_id = %code.id, expires_at = %code.expires_at, "One-time code created");
        Ok(code)
    }

    /// Check a submitted code against the user's active code.
    ///
    /// Every call counts as an attempt. A wrong code returns `Ok(false)`;
    /// an expired or exhausted code fails with `Forbidden`.
    #[instrument(skip(self, submitted))]
    pub async fn verify_code(&self, user_id: &str, submitted: &str) -> FaultResult<bool> {
        let mut code = self
            .ctx
            .code_repo()
            .find_active_by_user(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve code");
                Fault::bad_request("failed to verify code").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("no code found for user"))?;

        code.increment_attempt();

        if code.is_expired() {
            debug!(attempts = code.attempts, "One-time code has expired");
            self.persist(&code).await?;
            return Err(Fault::forbidden("code has expired"));
        }

        if code.is_max_attempts() {
            info!(attempts = code.attempts, "Max code attempts reached");
            self.persist(&code).await?;
            return Err(Fault::forbidden("max code attempts reached"));
        }

        if !code.matches(submitted) {
            debug!(attempts = code.attempts, "One-time code mismatch");
            self.persist(&code).await?;
            return Ok(false);
        }

        code.mark_as_used();
        self.persist(&code).await?;

        debug!("One-time code verified");
        Ok(true)
    }

    async fn persist(&self, code: &OneTimeCode) -> FaultResult<()> {
        self.ctx.code_repo().update(code).await.map_err(|e| {
            error!(error = %e, code_id = %code.id, "Failed to update code");
            Fault::bad_request("failed to verify code").with_source(e)
        })
    }
}
