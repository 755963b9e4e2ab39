//! Axum extractors for request handling
//!
//! Custom extractors for authentication and validated bodies.

mod auth;
mod validated;

pub use auth::{authenticate, AuthUser};
pub use validated::ValidatedJson;
