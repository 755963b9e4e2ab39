//! Service context - dependency container for services
//!
//! Holds the repositories, the cache, the mailer, and the token service.

use std::sync::Arc;
use std::time::Duration;

use gatehouse_common::{CacheConfig, Fault, FaultResult, Mailer, TokenService};
use gatehouse_core::traits::{CacheStore, CodeRepository, SessionRepository, UserRepository};

/// Lifetimes of the cache-aside entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub session_ttl: Duration,
    pub user_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(900),
            user_ttl: Duration::from_secs(1800),
        }
    }
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            session_ttl: config.session_ttl(),
            user_ttl: config.user_ttl(),
        }
    }
}

/// Service context containing all dependencies
///
/// Built once at startup and shared by reference with every service. All
/// collaborators sit behind traits so tests can swap in in-memory versions.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    code_repo: Arc<dyn CodeRepository>,
    session_repo: Arc<dyn SessionRepository>,

    // Cache
    cache: Arc<dyn CacheStore>,
    cache_settings: CacheSettings,

    // Collaborators
    mailer: Mailer,
    token_service: Arc<TokenService>,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn code_repo(&self) -> &dyn CodeRepository {
        self.code_repo.as_ref()
    }

    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    // === Cache ===

    pub fn cache(&self) -> &dyn CacheStore {
        self.cache.as_ref()
    }

    pub fn cache_settings(&self) -> CacheSettings {
        self.cache_settings
    }

    // === Collaborators ===

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    pub fn token_service(&self) -> &TokenService {
        self.token_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("cache_settings", &self.cache_settings)
            .field("mailer", &self.mailer)
            .field("token_service", &self.token_service)
            .finish()
    }
}

/// Builder for creating a [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    code_repo: Option<Arc<dyn CodeRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_settings: CacheSettings,
    mailer: Option<Mailer>,
    token_service: Option<Arc<TokenService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn code_repo(mut self, repo: Arc<dyn CodeRepository>) -> Self {
        self.code_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_settings(mut self, settings: CacheSettings) -> Self {
        self.cache_settings = settings;
        self
    }

    pub fn mailer(mut self, mailer: Mailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn token_service(mut self, service: Arc<TokenService>) -> Self {
        self.token_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns an internal fault naming the first missing dependency
    pub fn build(self) -> FaultResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self.user_repo.ok_or_else(|| missing("user_repo"))?,
            code_repo: self.code_repo.ok_or_else(|| missing("code_repo"))?,
            session_repo: self.session_repo.ok_or_else(|| missing("session_repo"))?,
            cache: self.cache.ok_or_else(|| missing("cache"))?,
            cache_settings: self.cache_settings,
            mailer: self.mailer.ok_or_else(|| missing("mailer"))?,
            token_service: self.token_service.ok_or_else(|| missing("token_service"))?,
        })
    }
}

fn missing(dependency: &str) -> Fault {
    Fault::internal(format!("{dependency} is required"))
}
