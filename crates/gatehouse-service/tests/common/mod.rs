//! In-memory collaborators for service tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use gatehouse_common::{hash_password, MailError, MailMessage, MailTransport, Mailer, RetryPolicy, TokenService};
use gatehouse_core::entities::{OneTimeCode, Session, User};
use gatehouse_core::error::DomainError;
use gatehouse_core::traits::{
    CacheStore, CodeRepository, NewUser, RepoResult, SessionRepository, UserRepository,
};
use gatehouse_service::ServiceContext;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const PASSWORD: &str = "Correct-Horse-42";
pub const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<String, (User, Option<String>)>>,
}

impl MemoryUsers {
    pub fn get(&self, id: &str) -> Option<User> {
        self.rows.lock().get(id).map(|(user, _)| user.clone())
    }

    pub fn count(&self) -> usize {
        self.rows.lock().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .values()
            .find(|(user, _)| user.email == email)
            .map(|(user, _)| user.clone()))
    }

    async fn create(&self, new_user: &NewUser) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let candidate = &new_user.user;
        for (user, _) in rows.values() {
            if user.email == candidate.email {
                return Err(DomainError::UniqueViolation { field: "email".to_string() });
            }
            if user.username.is_some() && user.username == candidate.username {
                return Err(DomainError::UniqueViolation { field: "username".to_string() });
            }
        }
        rows.insert(
            candidate.id.clone(),
            (candidate.clone(), new_user.password_hash.clone()),
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows.get_mut(&user.id).ok_or(DomainError::NotFound("User"))?;
        row.0 = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: &str) -> RepoResult<Option<String>> {
        Ok(self.rows.lock().get(id).and_then(|(_, hash)| hash.clone()))
    }
}

// ============================================================================
// Codes
// ============================================================================

#[derive(Default)]
pub struct MemoryCodes {
    rows: Mutex<Vec<OneTimeCode>>,
    fail_updates: AtomicBool,
    race_next_insert: AtomicBool,
}

impl MemoryCodes {
    pub fn all_for(&self, user_id: &str) -> Vec<OneTimeCode> {
        self.rows
            .lock()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn latest_for(&self, user_id: &str) -> OneTimeCode {
        self.all_for(user_id)
            .pop()
            .expect("user has no code")
    }

    pub fn modify_latest(&self, user_id: &str, change: impl FnOnce(&mut OneTimeCode)) {
        let mut rows = self.rows.lock();
        let code = rows
            .iter_mut()
            .rev()
            .find(|c| c.user_id == user_id)
            .expect("user has no code");
        change(code);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Let a competing request store its active code right before the next insert
    pub fn race_next_insert(&self) {
        self.race_next_insert.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CodeRepository for MemoryCodes {
    async fn insert(&self, code: &OneTimeCode) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if self.race_next_insert.swap(false, Ordering::SeqCst) {
            rows.push(OneTimeCode::new(code.user_id.clone()));
        }
        if rows.iter().any(|c| c.user_id == code.user_id && c.active) {
            return Err(DomainError::UniqueViolation { field: "user_id".to_string() });
        }
        rows.push(code.clone());
        Ok(())
    }

    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()> {
        for code in self.rows.lock().iter_mut().filter(|c| c.user_id == user_id) {
            code.active = false;
        }
        Ok(())
    }

    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<OneTimeCode>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|c| c.user_id == user_id && c.active)
            .cloned())
    }

    async fn update(&self, code: &OneTimeCode) -> RepoResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::Timeout(Duration::from_secs(2)));
        }
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|c| c.id == code.id)
            .ok_or(DomainError::NotFound("Code"))?;
        *row = code.clone();
        Ok(())
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Default)]
pub struct MemorySessions {
    rows: Mutex<Vec<Session>>,
}

impl MemorySessions {
    pub fn all_for(&self, user_id: &str) -> Vec<Session> {
        self.rows
            .lock()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn active_count(&self, user_id: &str) -> usize {
        self.all_for(user_id).iter().filter(|s| s.active).count()
    }

    pub fn put(&self, session: Session) {
        self.rows.lock().push(session);
    }
}

#[async_trait]
impl SessionRepository for MemorySessions {
    async fn insert(&self, session: &Session) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|s| s.user_id == session.user_id && s.active) {
            return Err(DomainError::UniqueViolation { field: "user_id".to_string() });
        }
        rows.push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Session>> {
        Ok(self.rows.lock().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> RepoResult<Option<Session>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|s| s.refresh_token == refresh_token)
            .cloned())
    }

    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<Session>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|s| s.user_id == user_id && s.active)
            .cloned())
    }

    async fn find_all_by_user(&self, user_id: &str) -> RepoResult<Vec<Session>> {
        let mut sessions = self.all_for(user_id);
        sessions.reverse();
        Ok(sessions)
    }

    async fn update(&self, session: &Session) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or(DomainError::NotFound("Session"))?;
        *row = session.clone();
        Ok(())
    }

    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()> {
        for session in self.rows.lock().iter_mut().filter(|s| s.user_id == user_id) {
            session.active = false;
        }
        Ok(())
    }
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    broken: AtomicBool,
}

impl MemoryCache {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: String) {
        self.entries.lock().insert(key.to_string(), value);
    }

    /// Make every operation fail from now on
    pub fn break_down(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), DomainError> {
        self.check()?;
        self.put_raw(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.check()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Mail
// ============================================================================

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
    down: AtomicBool,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(MailError::Transport("smtp relay unreachable".to_string()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub ctx: ServiceContext,
    pub users: Arc<MemoryUsers>,
    pub codes: Arc<MemoryCodes>,
    pub sessions: Arc<MemorySessions>,
    pub cache: Arc<MemoryCache>,
    pub mail: Arc<RecordingTransport>,
    pub tokens: Arc<TokenService>,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUsers::default());
        let codes = Arc::new(MemoryCodes::default());
        let sessions = Arc::new(MemorySessions::default());
        let cache = Arc::new(MemoryCache::default());
        let mail = Arc::new(RecordingTransport::default());
        let tokens = Arc::new(TokenService::new(SECRET, 900, 2_592_000).unwrap());

        let mailer = Mailer::new(
            mail.clone(),
            "Gatehouse <no-reply@test>",
            "http://localhost:8080",
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
                attempt_timeout: Duration::from_millis(200),
            },
        );

        let ctx = ServiceContext::builder()
            .user_repo(users.clone())
            .code_repo(codes.clone())
            .session_repo(sessions.clone())
            .cache(cache.clone())
            .mailer(mailer)
            .token_service(tokens.clone())
            .build()
            .unwrap();

        Self {
            ctx,
            users,
            codes,
            sessions,
            cache,
            mail,
            tokens,
        }
    }

    /// Insert a user straight into the repository
    pub async fn seed_user(&self, email: &str, enabled: bool, locked: bool) -> User {
        let mut user = User::new("Ann".to_string(), None, email.to_string());
        user.enabled = enabled;
        user.locked = locked;

        self.users
            .create(&NewUser {
                user: user.clone(),
                password_hash: Some(hash_password(PASSWORD).unwrap()),
            })
            .await
            .unwrap();
        user
    }
}
