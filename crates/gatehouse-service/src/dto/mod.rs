//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;
mod validation;

pub use requests::{LoginRequest, RefreshRequest, RegisterRequest, VerifyCodeRequest};
pub use responses::{
    HealthChecks, HealthResponse, LoginResponse, ReadinessResponse, RefreshResponse,
    SessionResponse, UserResponse, VerifyResponse,
};
pub use validation::validation_fault;
