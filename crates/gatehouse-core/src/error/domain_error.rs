//! Domain errors - error types for the domain and persistence boundary

use std::time::Duration;

use thiserror::Error;

/// Domain layer errors
///
/// Repositories report absence with `Ok(None)`; these variants cover the
/// failures that cross the storage boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("{0} not found")]
    NotFound(&'static str),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEntity(_) => "UNPROCESSABLE_ENTITY",
            Self::UniqueViolation { .. } => "CONFLICT",
            Self::Timeout(_) => "DATABASE_TIMEOUT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a uniqueness violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// Check if the storage deadline elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Field name of a uniqueness violation, if any
    pub fn conflicting_field(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { field } => Some(field),
            _ => None,
        }
    }
}
