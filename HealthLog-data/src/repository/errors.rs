use std::sync::PoisonError;
use thiserror::Error;
use crate::database::DatabaseError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store refused the row (constraint or check violation)
    #[error("Rejected by store: {0}")]
    Constraint(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(tokio_postgres::Error),

    /// Row could not be mapped back to a record
    #[error("Decode error: {0}")]
    Decode(String),

    /// Mutex lock error
    #[error("Mutex lock error: {0}")]
    MutexLock(String),
}

impl RepositoryError {
    /// Whether the failure was the store rejecting the data rather than the
    /// store being unavailable
    pub fn is_rejection(&self) -> bool {
        matches!(self, RepositoryError::Validation(_) | RepositoryError::Constraint(_))
    }
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::MutexLock(error.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for RepositoryError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                )
            }
            other => RepositoryError::Sqlite(other),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for RepositoryError {
    fn from(error: tokio_postgres::Error) -> Self {
        // SQLSTATE class 23 is integrity constraint violation
        let is_constraint = error
            .code()
            .map(|state| state.code().starts_with("23"))
            .unwrap_or(false);

        if is_constraint {
            let message = error
                .as_db_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| error.to_string());
            RepositoryError::Constraint(message)
        } else {
            RepositoryError::Postgres(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        assert!(RepositoryError::Constraint("CHECK failed".to_string()).is_rejection());
        assert!(RepositoryError::Validation("bad".to_string()).is_rejection());
        assert!(!RepositoryError::MutexLock("poisoned".to_string()).is_rejection());
        assert!(!RepositoryError::Database(DatabaseError::PoolNotInitialized).is_rejection());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_constraint_maps_to_constraint() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY)").unwrap();
        conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap();

        let err: RepositoryError = conn
            .execute("INSERT INTO t (id) VALUES ('a')", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, RepositoryError::Constraint(_)));
    }
}
