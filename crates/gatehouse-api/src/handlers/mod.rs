//! HTTP request handlers
//!
//! Handlers translate requests into service calls; all business rules live
//! in `gatehouse-service`.

pub mod auth;
pub mod health;
pub mod users;
