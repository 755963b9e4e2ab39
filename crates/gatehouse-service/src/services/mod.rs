//! Business logic services
//!
//! Every service reports failures as a [`Fault`](gatehouse_common::Fault)
//! tagged where the failure is first detected. Callers propagate it with `?`.

pub mod auth;
mod cache;
pub mod code;
pub mod context;
pub mod identity;
pub mod session;
pub mod user;

pub use auth::AuthService;
pub use code::CodeService;
pub use context::{CacheSettings, ServiceContext, ServiceContextBuilder};
pub use identity::AuthIdentity;
pub use session::SessionService;
pub use user::UserService;
