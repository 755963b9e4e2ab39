//! Test fixtures and data generators
//!
//! Provides reusable request and response shapes for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique across test binaries and repeated runs against the same database
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos:x}{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub const TEST_PASSWORD: &str = "TestPass123!";

/// Registration request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Account with a password
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: "Test User".to_string(),
            username: Some(format!("user_{suffix}")),
            email: format!("test{suffix}@example.com"),
            password: Some(TEST_PASSWORD.to_string()),
        }
    }

    /// Account that logs in with one-time codes only
    pub fn passwordless() -> Self {
        Self {
            username: None,
            password: None,
            ..Self::unique()
        }
    }
}

/// Login request; omitting the password asks for a one-time code
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }

    pub fn code_only(email: &str) -> Self {
        Self {
            email: email.to_string(),
            password: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful password login
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Public user profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub agent: String,
    pub ip: String,
    pub active: bool,
}

/// Error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub tag: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<FieldBody>,
}

#[derive(Debug, Deserialize)]
pub struct FieldBody {
    pub field: String,
    pub message: String,
}
