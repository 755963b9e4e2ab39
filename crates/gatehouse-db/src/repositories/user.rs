//! PostgreSQL implementation of UserRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use gatehouse_core::entities::User;
use gatehouse_core::error::DomainError;
use gatehouse_core::traits::{NewUser, RepoResult, UserRepository};

use crate::models::UserModel;

use super::error::with_deadline;

const USER_COLUMNS: &str =
    "id, name, username, email, avatar_url, enabled, locked, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    deadline: Duration,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = with_deadline(
            self.deadline,
            sqlx::query_as::<_, UserModel>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let result = with_deadline(
            self.deadline,
            sqlx::query_as::<_, UserModel>(&query)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self, new_user), fields(user_id = %new_user.user.id))]
    async fn create(&self, new_user: &NewUser) -> RepoResult<()> {
        let user = &new_user.user;
        with_deadline(
            self.deadline,
            sqlx::query(
                r"
                INSERT INTO users (id, name, username, email, password_hash, avatar_url,
                                   enabled, locked, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&new_user.password_hash)
            .bind(&user.avatar_url)
            .bind(user.enabled)
            .bind(user.locked)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = with_deadline(
            self.deadline,
            sqlx::query(
                r"
                UPDATE users
                SET name = $2, username = $3, avatar_url = $4, enabled = $5, locked = $6,
                    updated_at = $7
                WHERE id = $1
                ",
            )
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.avatar_url)
            .bind(user.enabled)
            .bind(user.locked)
            .bind(user.updated_at)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("user"));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: &str) -> RepoResult<Option<String>> {
        let hash = with_deadline(
            self.deadline,
            sqlx::query_scalar::<_, Option<String>>(
                "SELECT password_hash FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(hash.flatten())
    }
}
