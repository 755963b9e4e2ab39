//! Session database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: String,
    pub user_id: String,
    pub agent: String,
    pub ip: String,
    pub refresh_token: String,
    pub active: bool,
    pub expires: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
