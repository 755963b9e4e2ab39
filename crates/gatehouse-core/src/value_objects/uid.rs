//! Prefixed random identifiers
//!
//! Ids look like `user_4f0c3a6e9b1d4c1f8e2a7b5d6c9e0f12`: a short kind prefix
//! followed by the simple (hyphen-less) form of a UUID v4.

use std::fmt;

/// Kind prefix attached to generated ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidPrefix {
    User,
    Code,
    Session,
}

impl UidPrefix {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Code => "code",
            Self::Session => "sess",
        }
    }
}

impl fmt::Display for UidPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a new unique id with the given prefix.
///
/// An empty prefix yields the bare hex form.
pub fn new_uid(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    if prefix.is_empty() {
        raw
    } else {
        format!("{prefix}_{raw}")
    }
}
