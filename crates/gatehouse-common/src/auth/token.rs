//! Bearer token signing and verification
//!
//! Tokens are HS256 JWTs signed with a shared 32-byte secret. Access tokens
//! are short-lived, refresh tokens long-lived; the `token_type` claim keeps
//! one from being used in place of the other.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gatehouse_core::new_uid;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Required secret length in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Token failures. `Expired` is kept apart so callers can word it differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("invalid key size: must be exactly {SECRET_KEY_SIZE} bytes")]
    InvalidKeySize,

    #[error("token lifetime must be positive")]
    InvalidDuration,

    #[error("token has expired")]
    Expired,

    #[error("unexpected signing algorithm")]
    InvalidAlgorithm,

    #[error("unexpected token type")]
    WrongType,

    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID, unique per signature
    #[serde(default)]
    pub jti: String,
    pub token_type: TokenType,
}

impl Claims {
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Access and refresh token issued together at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Signs and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service. The secret must be exactly [`SECRET_KEY_SIZE`] bytes.
    pub fn new(
        secret: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Result<Self, TokenError> {
        if secret.len() != SECRET_KEY_SIZE {
            return Err(TokenError::InvalidKeySize);
        }
        if access_ttl_secs <= 0 || refresh_ttl_secs <= 0 {
            return Err(TokenError::InvalidDuration);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        })
    }

    #[inline]
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    #[inline]
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign a token for `user_id` valid for `ttl`
    pub fn sign(
        &self,
        user_id: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidDuration);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: new_uid(""),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Sign a short-lived access token
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        self.sign(user_id, TokenType::Access, self.access_ttl)
    }

    /// Sign an access and a refresh token for the same user
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id)?,
            refresh_token: self.sign(user_id, TokenType::Refresh, self.refresh_ttl)?,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Decode and validate a token of any type
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm => TokenError::InvalidAlgorithm,
                _ => TokenError::Invalid,
            })
    }

    /// Validate an access token and return the claims
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenType::Access {
            return Err(TokenError::WrongType);
        }
        Ok(claims)
    }

    /// Validate a refresh token and return the claims
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(TokenError::WrongType);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
