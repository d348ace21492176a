//! Unified error type for all layers of the application.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the SOA user service.
///
/// The service layer never wraps or rewrites these: whatever the DAO or the
/// transaction manager returns is what the caller sees.
#[derive(Error, Debug)]
pub enum SoaError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Transaction begin/commit/rollback failure
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoaError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Transaction(_) => "TRANSACTION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a database error.
    #[must_use]
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database(message.into())
    }

    /// Creates a transaction error.
    #[must_use]
    pub fn transaction<T: Into<String>>(message: T) -> Self {
        Self::Transaction(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Transaction(_) | Self::Timeout(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for SoaError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut => Self::Timeout("database connection pool".to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SoaError::not_found("User", 1).error_code(), "NOT_FOUND");
        assert_eq!(SoaError::database("down").error_code(), "DATABASE_ERROR");
        assert_eq!(SoaError::transaction("commit").error_code(), "TRANSACTION_ERROR");
        assert_eq!(SoaError::Timeout("t".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            SoaError::Configuration("missing".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(SoaError::internal("err").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            SoaError::from(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_retriable_errors() {
        assert!(SoaError::database("connection lost").is_retriable());
        assert!(SoaError::transaction("deadlock").is_retriable());
        assert!(SoaError::Timeout("slow".to_string()).is_retriable());
        assert!(!SoaError::not_found("User", 1).is_retriable());
        assert!(!SoaError::Configuration("bad".to_string()).is_retriable());
        assert!(!SoaError::internal("bug").is_retriable());
    }

    #[test]
    fn test_error_display() {
        let err = SoaError::not_found("User", 42);
        assert_eq!(err.to_string(), "Resource not found: User with id 42");

        let err = SoaError::transaction("commit refused");
        assert_eq!(err.to_string(), "Transaction error: commit refused");
    }

    #[test]
    fn test_other_is_transparent() {
        let err = SoaError::from(anyhow::anyhow!("underlying cause"));
        assert_eq!(err.to_string(), "underlying cause");
    }
}
