//! Authentication utilities

mod password;
mod token;

pub use password::{check_password_strength, hash_password, verify_password};
pub use token::{Claims, TokenError, TokenPair, TokenService, TokenType, SECRET_KEY_SIZE};
