//! Ports implemented by the infrastructure crates

mod cache;
mod repositories;

pub use cache::CacheStore;
pub use repositories::{CodeRepository, NewUser, RepoResult, SessionRepository, UserRepository};
