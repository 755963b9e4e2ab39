//! One-time code database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for codes table
#[derive(Debug, Clone, FromRow)]
pub struct CodeModel {
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
