//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations and their translation into port errors.

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The locked row is in a state that forbids the write
    #[error("Write refused: {0}")]
    StaleWrite(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be turned back into a domain record
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Policy", "POL-123");
    /// assert!(error.to_string().contains("Policy"));
    /// ```
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a corrupt row error
    pub fn corrupt(table: &'static str, message: impl std::fmt::Display) -> Self {
        DatabaseError::CorruptRow {
            table,
            message: message.to_string(),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Maps SQLx errors to DatabaseError variants by PostgreSQL error code
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound {
                entity: "Record",
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23503") => {
                        DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                    }
                    Some("23514") => {
                        DatabaseError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Translates a database error into the port error the domain sees
pub fn db_to_port_error(error: DatabaseError) -> PortError {
    match error {
        DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
        DatabaseError::DuplicateEntry(message) | DatabaseError::StaleWrite(message) => {
            PortError::conflict(message)
        }
        DatabaseError::ForeignKeyViolation(message)
        | DatabaseError::ConstraintViolation(message) => PortError::validation(message),
        DatabaseError::ConnectionFailed(message) => PortError::connection(message),
        DatabaseError::PoolExhausted => PortError::Timeout {
            operation: "acquire connection".to_string(),
            duration_ms: 0,
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port = db_to_port_error(DatabaseError::not_found("Policy", "POL-1"));
        assert!(port.is_not_found());
        assert!(port.to_string().contains("POL-1"));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let port = db_to_port_error(DatabaseError::DuplicateEntry("policy_number".into()));
        assert!(matches!(port, PortError::Conflict { .. }));
    }

    #[test]
    fn test_stale_write_maps_to_conflict() {
        let port = db_to_port_error(DatabaseError::StaleWrite("policy is canceled".into()));
        assert!(matches!(port, PortError::Conflict { .. }));
        assert!(!port.is_transient());
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        assert!(db_to_port_error(DatabaseError::PoolExhausted).is_transient());
    }

    #[test]
    fn test_row_not_found() {
        assert!(DatabaseError::from(sqlx::Error::RowNotFound).is_not_found());
    }
}
