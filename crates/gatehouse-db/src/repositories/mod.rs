//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! gatehouse-core. Every query runs under the repository's deadline.

mod code;
mod error;
mod session;
mod user;

pub use code::PgCodeRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
