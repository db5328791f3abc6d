//! Error types for the event store library.

use thiserror::Error;

/// Comprehensive error type for all event store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database statement or mapping errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Connection acquisition failures (pool exhausted or connection broken)
    #[error("Connection pool error: {message}")]
    Pool {
        message: String,
        #[source]
        source: r2d2::Error,
    },
    /// A required statement executed but affected zero rows; the enclosing
    /// transaction has been rolled back
    #[error("{operation} aborted: {reason}")]
    WriteConflict {
        operation: &'static str,
        reason: String,
    },
    /// Rollback of a failed transaction itself failed. The connection is in
    /// an unknown state and the caller must treat this as fatal.
    #[error("Rollback failed during {operation}")]
    RollbackFailed {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
}

impl StoreError {
    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Creates a new input validation error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| StoreError::database_error(message, e))
    }
}

/// Extension trait for pool-related Results.
pub trait PoolResultExt<T> {
    /// Map connection pool errors with a message.
    fn pool_context(self, message: &str) -> Result<T>;
}

impl<T> PoolResultExt<T> for std::result::Result<T, r2d2::Error> {
    fn pool_context(self, message: &str) -> Result<T> {
        self.map_err(|e| StoreError::Pool {
            message: message.to_string(),
            source: e,
        })
    }
}

/// Result type alias for event store operations
pub type Result<T> = std::result::Result<T, StoreError>;
