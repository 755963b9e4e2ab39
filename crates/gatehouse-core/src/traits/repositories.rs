//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Absence is reported as `Ok(None)`; a
//! duplicate key comes back as [`DomainError::UniqueViolation`] naming the
//! offending field.

use async_trait::async_trait;

use crate::entities::{OneTimeCode, Session, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Insert payload for a user together with its optional password hash
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user: User,
    pub password_hash: Option<String>,
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, new_user: &NewUser) -> RepoResult<()>;

    /// Persist mutable user fields (flags, profile)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: &str) -> RepoResult<Option<String>>;
}

// ============================================================================
// One-Time Code Repository
// ============================================================================

#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Insert a new code
    async fn insert(&self, code: &OneTimeCode) -> RepoResult<()>;

    /// Deactivate every active code of a user. No-op when there is none.
    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()>;

    /// Find the user's active code
    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<OneTimeCode>>;

    /// Persist attempts, flags and timestamps of an existing code
    async fn update(&self, code: &OneTimeCode) -> RepoResult<()>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session
    async fn insert(&self, session: &Session) -> RepoResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Session>>;

    /// Find session by its refresh token
    async fn find_by_refresh_token(&self, refresh_token: &str) -> RepoResult<Option<Session>>;

    /// Find the user's active session
    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<Session>>;

    /// List every session of a user, newest first
    async fn find_all_by_user(&self, user_id: &str) -> RepoResult<Vec<Session>>;

    /// Persist the active flag and timestamps of an existing session
    async fn update(&self, session: &Session) -> RepoResult<()>;

    /// Deactivate every active session of a user
    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()>;
}
