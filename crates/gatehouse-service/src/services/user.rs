//! User service
//!
//! Account creation and lookups.

use gatehouse_common::{check_password_strength, hash_password, Fault, FaultResult, FieldError};
use gatehouse_core::entities::User;
use gatehouse_core::error::DomainError;
use gatehouse_core::traits::NewUser;
use tracing::{error, info, instrument};
use validator::Validate;

use crate::dto::{validation_fault, RegisterRequest};

use super::context::ServiceContext;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a disabled account, hashing the password when one is given
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(&self, request: RegisterRequest) -> FaultResult<User> {
        request.validate().map_err(|e| validation_fault(&e))?;

        let mut fields = Vec::new();
        if let Some(username) = &request.username {
            if !is_valid_username(username) {
                fields.push(FieldError::new(
                    "username",
                    "username may only contain letters, digits and underscores",
                ));
            }
        }
        if let Some(password) = &request.password {
            if let Err(message) = check_password_strength(password) {
                fields.push(FieldError::new("password", message));
            }
        }
        if !fields.is_empty() {
            return Err(Fault::validation("invalid request body", fields));
        }

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let user = User::new(
            request.name.trim().to_string(),
            request.username,
            normalize_email(&request.email),
        );

        self.ctx
            .user_repo()
            .create(&NewUser {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DomainError::UniqueViolation { .. } => Fault::from(e),
                other => {
                    error!(error = %other, "Failed to create user");
                    Fault::bad_request("failed to create user").with_source(other)
                }
            })?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, user_id: &str) -> FaultResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve user by id");
                Fault::bad_request("failed to retrieve user").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("user not found"))
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> FaultResult<User> {
        self.ctx
            .user_repo()
            .find_by_email(&normalize_email(email))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to retrieve user by email");
                Fault::bad_request("failed to get user by email").with_source(e)
            })?
            .ok_or_else(|| Fault::not_found("user not found"))
    }
}

/// Emails are stored and looked up lowercased
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@X.com "), "ann@x.com");
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("ann_42"));
        assert!(!is_valid_username("ann-42"));
        assert!(!is_valid_username("ann 42"));
    }
}
