//! Database error categorization
//!
//! Maps `sea_orm::DbErr` values onto a small set of kinds so that services
//! can turn storage failures into domain errors (conflicts, unavailable
//! store, internal failures) without inspecting driver messages themselves.

use sea_orm::{DbErr, SqlErr};

/// Categories of database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Record not found (query returned no results)
    NotFound,

    /// Unique constraint violation, e.g. a duplicate category name or customer email
    UniqueViolation,

    /// Foreign key constraint violation, e.g. deleting a category still used by dishes
    ForeignKeyViolation,

    /// Database connection error
    ConnectionError,

    /// Query timeout
    Timeout,

    /// Unknown/other database error
    Unknown,
}

impl DbErrorKind {
    /// Categorize a sea_orm database error
    ///
    /// ```
    /// use dishboard::common::db_errors::DbErrorKind;
    /// use sea_orm::DbErr;
    ///
    /// let err = DbErr::RecordNotFound("Category not found".to_string());
    /// assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::NotFound);
    /// ```
    pub fn from_db_err(err: &DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Self::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => return Self::ForeignKeyViolation,
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(_) => Self::NotFound,
            DbErr::Conn(_) => {
                if err.to_string().to_lowercase().contains("timeout") {
                    Self::Timeout
                } else {
                    Self::ConnectionError
                }
            }
            _ => Self::from_message(&err.to_string()),
        }
    }

    fn from_message(message: &str) -> Self {
        let msg_lower = message.to_lowercase();
        if msg_lower.contains("unique") || msg_lower.contains("duplicate") {
            Self::UniqueViolation
        } else if msg_lower.contains("foreign key") {
            Self::ForeignKeyViolation
        } else if msg_lower.contains("timed out") || msg_lower.contains("timeout") {
            Self::Timeout
        } else if msg_lower.contains("acquire") || msg_lower.contains("connection") {
            Self::ConnectionError
        } else {
            Self::Unknown
        }
    }

    /// Get appropriate HTTP status code for this error kind
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::UniqueViolation => 409,
            Self::ForeignKeyViolation => 409,
            Self::ConnectionError => 503,
            Self::Timeout => 504,
            Self::Unknown => 500,
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::UniqueViolation | Self::ForeignKeyViolation
        )
    }
}

/// Format database error with operation context
///
/// ```
/// use dishboard::common::db_errors::*;
/// use sea_orm::DbErr;
///
/// let err = DbErr::RecordNotFound("missing".to_string());
/// let (kind, message) = format_db_error("delete category", &err);
///
/// assert_eq!(kind, DbErrorKind::NotFound);
/// assert_eq!(message, "delete category: record not found");
/// ```
pub fn format_db_error(operation: &str, err: &DbErr) -> (DbErrorKind, String) {
    let kind = DbErrorKind::from_db_err(err);

    let message = match kind {
        DbErrorKind::NotFound => format!("{}: record not found", operation),
        DbErrorKind::UniqueViolation => format!("{}: duplicate key violation", operation),
        DbErrorKind::ForeignKeyViolation => {
            format!("{}: record is still referenced", operation)
        }
        DbErrorKind::ConnectionError => format!("{}: database connection failed", operation),
        DbErrorKind::Timeout => format!("{}: query timeout", operation),
        DbErrorKind::Unknown => format!("{}: database error - {}", operation, err),
    };

    (kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_by_message() {
        let err = DbErr::Custom("UNIQUE constraint failed: categories.name".to_string());
        assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::UniqueViolation);

        let err = DbErr::Custom("FOREIGN KEY constraint failed".to_string());
        assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::ForeignKeyViolation);

        let err = DbErr::Custom("something odd".to_string());
        assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::Unknown);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DbErrorKind::NotFound.http_status_code(), 404);
        assert_eq!(DbErrorKind::UniqueViolation.http_status_code(), 409);
        assert_eq!(DbErrorKind::ConnectionError.http_status_code(), 503);
        assert!(DbErrorKind::ForeignKeyViolation.is_client_error());
        assert!(!DbErrorKind::Unknown.is_client_error());
    }

    #[test]
    fn test_format_unknown_includes_details() {
        let err = DbErr::Custom("disk I/O error".to_string());
        let (kind, message) = format_db_error("list reviews", &err);
        assert_eq!(kind, DbErrorKind::Unknown);
        assert!(message.starts_with("list reviews: database error"));
        assert!(message.contains("disk I/O error"));
    }
}
