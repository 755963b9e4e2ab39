//! Password hashing and verification utilities
//!
//! Uses Argon2id for password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::Fault;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, Fault> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Fault::internal("failed to hash password").with_source(e.to_string()))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Fault> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Fault::internal("invalid password hash format").with_source(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check password strength
///
/// Requires at least 8 characters with an uppercase letter, a lowercase
/// letter and a digit. Returns the first unmet requirement.
pub fn check_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("password must be at least 8 characters long");
    }
    if !password.chars().any(char::is_uppercase) {
        return Err("password must contain at least one uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return Err("password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain at least one digit");
    }
    Ok(())
}
