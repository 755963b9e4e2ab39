//! # gatehouse-service
//!
//! Application layer containing the authentication use cases and DTOs.
//!
//! Services borrow a [`ServiceContext`] for the duration of a call:
//!
//! ```ignore
//! let response = AuthService::new(&ctx).login(&email, &password, ip, agent).await?;
//! ```

pub mod dto;
pub mod services;

pub use services::{
    AuthIdentity, AuthService, CacheSettings, CodeService, ServiceContext, ServiceContextBuilder,
    SessionService, UserService,
};
