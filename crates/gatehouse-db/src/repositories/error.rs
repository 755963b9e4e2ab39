//! Error handling utilities for repositories

use std::future::Future;
use std::time::Duration;

use gatehouse_core::error::DomainError;
use gatehouse_core::traits::RepoResult;
use sqlx::Error as SqlxError;

/// Convert an SQLx error to a DomainError.
///
/// Unique violations become [`DomainError::UniqueViolation`] naming the
/// offending column.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .map_or_else(|| "resource".to_string(), field_from_constraint);
            return DomainError::UniqueViolation { field };
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Extract the column name from a `{table}_{column}_key` constraint name
pub fn field_from_constraint(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_key").unwrap_or(constraint);
    match trimmed.split_once('_') {
        Some((_table, field)) if !field.is_empty() => field.to_string(),
        _ => trimmed.to_string(),
    }
}

/// Run a query under a deadline. Elapsing yields [`DomainError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, query: F) -> RepoResult<T>
where
    F: Future<Output = Result<T, SqlxError>>,
{
    match tokio::time::timeout(deadline, query).await {
        Ok(result) => result.map_err(map_db_error),
        Err(_) => Err(DomainError::Timeout(deadline)),
    }
}
