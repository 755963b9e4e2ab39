//! Authenticated caller identity

use gatehouse_common::{Claims, Fault, FaultResult};

/// Caller resolved from a verified access token.
///
/// Handlers receive it from the auth extractor and pass it explicitly to
/// every operation acting on behalf of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    user_id: String,
}

impl AuthIdentity {
    pub fn new(user_id: impl Into<String>) -> FaultResult<Self> {
        let user_id = user_id.into();
        if user_id.is_empty() {
            return Err(Fault::unauthorized("access token not provided"));
        }
        Ok(Self { user_id })
    }

    pub fn from_claims(claims: &Claims) -> FaultResult<Self> {
        Self::new(claims.user_id())
    }

    #[inline]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
