//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Account registration. Accounts created without a password log in with
/// one-time codes only.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 3, max = 32, message = "username must be 3-32 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: Option<String>,
}

/// Login request. Without a password a one-time code is mailed instead.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    pub password: Option<String>,
}

/// One-time code submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(custom(function = "validate_code_digits"))]
    pub code: String,
}

fn validate_code_digits(code: &str) -> Result<(), ValidationError> {
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::new("code").with_message(Cow::Borrowed("code must have 6 digits")))
}

/// Access token renewal
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh token is required"))]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_without_password() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"name": "Ann", "email": "ann@x.com"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert!(request.password.is_none());
        assert!(request.username.is_none());
    }

    #[test]
    fn test_register_rejects_bad_email_and_short_username() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"name": "Ann", "username": "an", "email": "not-an-email"}"#,
        )
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
    }

    #[test]
    fn test_verify_code_format() {
        for code in ["12345", "1234567", "abcdef", "12 456", "１２３４５６"] {
            let request = VerifyCodeRequest {
                code: code.to_string(),
            };
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("code"), "accepted {code:?}");
        }

        let request = VerifyCodeRequest {
            code: "042917".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_refresh_request_is_camel_case() {
        let request: RefreshRequest =
            serde_json::from_str(r#"{"refreshToken": "abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }
}
