//! One-time code entity - short numeric codes used for passwordless login
//!
//! A code moves from active to one of three terminal states: expired,
//! maxed out, or used. Wrong guesses keep it active while the attempt
//! counter grows.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::value_objects::{new_uid, UidPrefix};

/// Number of digits in a generated code
pub const CODE_LENGTH: usize = 6;

/// Lifetime of a code from creation
pub const CODE_TTL_SECONDS: i64 = 180;

/// Attempt count at which a code stops accepting guesses
pub const MAX_CODE_ATTEMPTS: i32 = 3;

/// One-time code bound to a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeCode {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub active: bool,
    pub attempts: i32,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Create a fresh active code for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_uid(UidPrefix::Code.as_str()),
            user_id: user_id.into(),
            code: generate_numeric_code(CODE_LENGTH),
            active: true,
            attempts: 0,
            used_at: None,
            expires_at: now + Duration::seconds(CODE_TTL_SECONDS),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the code is past its expiry, regardless of `active`
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check whether the attempt budget is exhausted
    pub fn is_max_attempts(&self) -> bool {
        self.attempts >= MAX_CODE_ATTEMPTS
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = self.code.as_bytes();
        let given = submitted.as_bytes();
        if expected.len() != given.len() {
            return false;
        }
        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    pub fn increment_attempt(&mut self) {
        self.attempts += 1;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Record a successful verification. The code can never become active again.
    pub fn mark_as_used(&mut self) {
        let now = Utc::now();
        self.used_at = Some(now);
        self.active = false;
        self.updated_at = now;
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

fn generate_numeric_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
