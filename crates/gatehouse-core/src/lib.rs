//! # gatehouse-core
//!
//! Domain layer containing the authentication entities, value objects, and
//! repository contracts. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{OneTimeCode, Session, User, CODE_LENGTH, CODE_TTL_SECONDS, MAX_CODE_ATTEMPTS};
pub use error::DomainError;
pub use traits::{CacheStore, CodeRepository, NewUser, RepoResult, SessionRepository, UserRepository};
pub use value_objects::{describe_agent, new_uid, UidPrefix, UNKNOWN_AGENT};
