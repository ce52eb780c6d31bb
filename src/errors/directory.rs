//! Directory error types
//!
//! Structured errors for the restaurant directory: CRUD operations on
//! restaurants, dishes, categories, customers and reviews, and the input
//! validation done at the boundary before any report is executed.
//!
//! # Examples
//!
//! ```rust
//! use dishboard::errors::DirectoryError;
//!
//! let err = DirectoryError::not_found("restaurant", 42);
//! assert!(err.is_not_found());
//!
//! let err = DirectoryError::validation("score", "must be a positive number");
//! assert_eq!(err.error_code(), "VALIDATION_FAILED");
//! ```

use sea_orm::DbErr;
use thiserror::Error;

use crate::common::db_errors::{format_db_error, DbErrorKind};

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Entity not found by ID
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Input rejected before touching the store
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Write would violate a uniqueness or reference rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store could not be reached
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DirectoryError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DirectoryError::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify a storage error raised while performing `operation`.
    pub fn from_db(operation: &str, err: DbErr) -> Self {
        let (kind, message) = format_db_error(operation, &err);
        match kind {
            DbErrorKind::UniqueViolation | DbErrorKind::ForeignKeyViolation => {
                DirectoryError::Conflict(message)
            }
            DbErrorKind::ConnectionError | DbErrorKind::Timeout => {
                DirectoryError::Unavailable(message)
            }
            DbErrorKind::NotFound | DbErrorKind::Unknown => DirectoryError::Database(err),
        }
    }

    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DirectoryError::NotFound { .. }
                | DirectoryError::Validation { .. }
                | DirectoryError::Conflict(_)
        )
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }

    /// Get error code for GraphQL/API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound { .. } => "NOT_FOUND",
            DirectoryError::Validation { .. } => "VALIDATION_FAILED",
            DirectoryError::Conflict(_) => "CONFLICT",
            DirectoryError::Unavailable(_) => "DATABASE_UNAVAILABLE",
            DirectoryError::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn http_status_code(&self) -> u16 {
        match self {
            DirectoryError::NotFound { .. } => 404,
            DirectoryError::Validation { .. } => 400,
            DirectoryError::Conflict(_) => 409,
            DirectoryError::Unavailable(_) => 503,
            DirectoryError::Database(_) => 500,
        }
    }

    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            DirectoryError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = DirectoryError::not_found("dish", 7);
        assert_eq!(err.to_string(), "dish 7 not found");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn test_validation_error() {
        let err = DirectoryError::validation("email", "is not a valid address");
        assert_eq!(err.to_string(), "Invalid email: is not a valid address");
        assert_eq!(err.field(), Some("email"));
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = DirectoryError::from_db(
            "create category",
            DbErr::Custom("UNIQUE constraint failed: categories.name".to_string()),
        );
        assert!(matches!(err, DirectoryError::Conflict(_)));
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn test_unknown_db_error_is_internal() {
        let err = DirectoryError::from_db("list dishes", DbErr::Custom("boom".to_string()));
        assert!(!err.is_client_error());
        assert_eq!(err.http_status_code(), 500);
    }
}
