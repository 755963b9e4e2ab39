//! PostgreSQL implementation of SessionRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gatehouse_core::entities::Session;
use gatehouse_core::error::DomainError;
use gatehouse_core::traits::{RepoResult, SessionRepository};

use crate::models::SessionModel;

use super::error::with_deadline;

const SESSION_COLUMNS: &str =
    "id, user_id, agent, ip, refresh_token, active, expires, created, updated";

/// PostgreSQL implementation of SessionRepository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
    deadline: Duration,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }

    async fn find_one(&self, filter: &str, value: &str) -> RepoResult<Option<Session>> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE {filter} LIMIT 1");
        let result = with_deadline(
            self.deadline,
            sqlx::query_as::<_, SessionModel>(&query)
                .bind(value)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(result.map(Session::from))
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, session), fields(session_id = %session.id, user_id = %session.user_id))]
    async fn insert(&self, session: &Session) -> RepoResult<()> {
        with_deadline(
            self.deadline,
            sqlx::query(
                r"
                INSERT INTO sessions (id, user_id, agent, ip, refresh_token, active, expires,
                                      created, updated)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(&session.agent)
            .bind(&session.ip)
            .bind(&session.refresh_token)
            .bind(session.active)
            .bind(session.expires)
            .bind(session.created)
            .bind(session.updated)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Session>> {
        self.find_one("id = $1", id).await
    }

    #[instrument(skip_all)]
    async fn find_by_refresh_token(&self, refresh_token: &str) -> RepoResult<Option<Session>> {
        self.find_one("refresh_token = $1", refresh_token).await
    }

    #[instrument(skip(self))]
    async fn find_active_by_user(&self, user_id: &str) -> RepoResult<Option<Session>> {
        self.find_one("user_id = $1 AND active", user_id).await
    }

    #[instrument(skip(self))]
    async fn find_all_by_user(&self, user_id: &str) -> RepoResult<Vec<Session>> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created DESC"
        );
        let rows = with_deadline(
            self.deadline,
            sqlx::query_as::<_, SessionModel>(&query)
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    #[instrument(skip(self, session), fields(session_id = %session.id, active = session.active))]
    async fn update(&self, session: &Session) -> RepoResult<()> {
        let result = with_deadline(
            self.deadline,
            sqlx::query("UPDATE sessions SET active = $2, updated = $3 WHERE id = $1")
                .bind(&session.id)
                .bind(session.active)
                .bind(session.updated)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("session"));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn deactivate_all(&self, user_id: &str) -> RepoResult<()> {
        with_deadline(
            self.deadline,
            sqlx::query(
                "UPDATE sessions SET active = FALSE, updated = NOW() WHERE user_id = $1 AND active",
            )
            .bind(user_id)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
