//! Session entity - one authenticated device/browser login

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{describe_agent, new_uid, UidPrefix};

/// Login session tied to a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Human readable device descriptor, e.g. "Firefox on Linux"
    pub agent: String,
    pub ip: String,
    pub refresh_token: String,
    pub active: bool,
    pub expires: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Session {
    /// Create a new active session. `raw_agent` is the request's `User-Agent`.
    pub fn new(
        user_id: impl Into<String>,
        ip: impl Into<String>,
        raw_agent: &str,
        refresh_token: impl Into<String>,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_uid(UidPrefix::Session.as_str()),
            user_id: user_id.into(),
            agent: describe_agent(raw_agent),
            ip: ip.into(),
            refresh_token: refresh_token.into(),
            active: true,
            expires: now + lifetime,
            created: now,
            updated: now,
        }
    }

    /// Check expiry by the session's own `expires` field
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires
    }

    /// A session can mint access tokens only while active and unexpired
    pub fn is_usable(&self) -> bool {
        self.active && !self.is_expired()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated = Utc::now();
    }
}
