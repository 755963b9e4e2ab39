//! PostgreSQL implementation of CodeRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gatehouse_core::entities::OneTimeCode;
use gatehouse_core::error::DomainError;
use gatehouse_core::traits::{CodeRepository, RepoResult};

use crate::models::CodeModel;

use super::error::with_deadline;

/// PostgreSQL implementation of CodeRepository
#[derive(Clone)]
pub struct PgCodeRepository {
    pool: PgPool,
    deadline: Duration,
}

impl PgCodeRepository {
    /// Create a new PgCodeRepository
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl CodeRepository for PgCodeRepository {
    #[instrument(skip(self, code), fields(code_id = %code.id, user_id = %code.user_id))]
    async fn insert(&self, code: &OneTimeCode) -> RepoResult<()> {
        with_deadline(
            self.deadline,
            sqlx::query(
                r"
                INSERT INTO codes (id, user_id, code, active, attempts, used_at, expires_at,
                                   created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(&code.id)
            .bind(&code.user_id)
            .bind(&code.code)
            .bind(code.active)
            .bind(code.attempts)
            .bind(code.used_at)
            .bind(code.expires_at)
            .bind(code.created_at)
            .bind(code.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()> {
        with_deadline(
            self.deadline,
            sqlx::query(
                "UPDATE codes SET active = FALSE, updated_at = NOW() WHERE user_id = $1 AND active",
            )
            .bind(user_id)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<OneTimeCode>> {
        let result = with_deadline(
            self.deadline,
            sqlx::query_as::<_, CodeModel>(
                r"
                SELECT id, user_id, code, active, attempts, used_at, expires_at,
                       created_at, updated_at
                FROM codes
                WHERE user_id = $1 AND active
                ORDER BY created_at DESC
                LIMIT 1
                ",
            )
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(result.map(OneTimeCode::from))
    }

    #[instrument(skip(self, code), fields(code_id = %code.id, attempts = code.attempts))]
    async fn update(&self, code: &OneTimeCode) -> RepoResult<()> {
        let result = with_deadline(
            self.deadline,
            sqlx::query(
                r"
                UPDATE codes
                SET active = $2, attempts = $3, used_at = $4, updated_at = $5
                WHERE id = $1
                ",
            )
            .bind(&code.id)
            .bind(code.active)
            .bind(code.attempts)
            .bind(code.used_at)
            .bind(code.updated_at)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("code"));
        }

        Ok(())
    }
}
