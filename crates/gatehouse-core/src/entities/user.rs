//! User entity - an account that can authenticate

use chrono::{DateTime, Utc};

use crate::value_objects::{new_uid, UidPrefix};

/// User account. The password hash is stored separately and never loaded
/// into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
    pub enabled: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet activated user
    pub fn new(name: String, username: Option<String>, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: new_uid(UidPrefix::User.as_str()),
            name,
            username,
            email,
            avatar_url: None,
            enabled: false,
            locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Enable the account after activation
    pub fn enable(&mut self) {
        self.enabled = true;
        self.updated_at = Utc::now();
    }

    pub fn lock(&mut self) {
        self.locked = true;
        self.updated_at = Utc::now();
    }
}
