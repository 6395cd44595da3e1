use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::LogRecord;
use super::errors::RepositoryError;
use super::filter::EntryFilter;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for one kind of health log record
#[async_trait]
pub trait LogRepositoryTrait<T: LogRecord>: Send + Sync {
    /// Store a new record and return it with its generated id
    async fn create(&self, new: T::New) -> Result<T, RepositoryError>;

    /// Get a page of one user's records and the total matching the filter
    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<(Vec<T>, usize), RepositoryError>;
}

/// Repository for health log records.
///
/// Uses the global database pool once it is initialized. Until then records
/// are kept in process memory.
#[derive(Debug, Clone)]
pub struct LogRepository<T: LogRecord> {
    /// In-memory storage for when database is not available
    storage: InMemoryStorage<T>,
}

impl<T: LogRecord> Default for LogRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LogRecord> LogRepository<T> {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

/// Current time in the stored timestamp format
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl<T: LogRecord> LogRepositoryTrait<T> for LogRepository<T> {
    async fn create(&self, new: T::New) -> Result<T, RepositoryError> {
        let record = T::from_new(Uuid::new_v4().to_string(), now_timestamp(), new);

        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing record in {}: {}", T::TABLE, record.header().id);
                DatabaseStorage::insert(&pool, &record).await.map_err(|e| {
                    error!("Failed to store record in {}: {}", T::TABLE, e);
                    e
                })?;
                Ok(record)
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store(&record).await
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<(Vec<T>, usize), RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Listing {} from database for user {}", T::TABLE, user_id);
                DatabaseStorage::list_for_user(&pool, user_id, filter).await.map_err(|e| {
                    error!("Failed to list records from {}: {}", T::TABLE, e);
                    e
                })
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage for list_for_user", e);
                self.storage.list_for_user(user_id, filter).await
            }
        }
    }
}

/// Mock log repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::NewLogRecord;

    /// Failure a mock repository reports instead of storing
    #[derive(Debug, Clone)]
    pub enum MockFailure {
        /// Behave like a constraint violation
        Rejected(String),
        /// Behave like an unreachable database
        Unavailable(String),
    }

    impl MockFailure {
        fn to_error(&self) -> RepositoryError {
            match self {
                MockFailure::Rejected(message) => RepositoryError::Constraint(message.clone()),
                MockFailure::Unavailable(message) => RepositoryError::Database(
                    crate::database::DatabaseError::GenericError(message.clone()),
                ),
            }
        }
    }

    /// Mock implementation of LogRepository for testing
    pub struct MockLogRepository<T: LogRecord> {
        records: Mutex<Vec<T>>,
        failure: Option<MockFailure>,
    }

    impl<T: LogRecord> Default for MockLogRepository<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: LogRecord> MockLogRepository<T> {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                failure: None,
            }
        }

        /// Create a mock repository with predefined records
        pub fn with_records(records: Vec<T>) -> Self {
            Self {
                records: Mutex::new(records),
                failure: None,
            }
        }

        /// Make every call fail
        pub fn failing(failure: MockFailure) -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                failure: Some(failure),
            }
        }

        /// Records stored so far
        pub fn stored(&self) -> Vec<T> {
            self.records.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl<T: LogRecord> LogRepositoryTrait<T> for MockLogRepository<T> {
        async fn create(&self, new: T::New) -> Result<T, RepositoryError> {
            if let Some(failure) = &self.failure {
                return Err(failure.to_error());
            }

            debug!("Mock storing record for {}", new.user_id());
            let record = T::from_new(Uuid::new_v4().to_string(), now_timestamp(), new);
            self.records.lock()?.push(record.clone());
            Ok(record)
        }

        async fn list_for_user(
            &self,
            user_id: &str,
            filter: &EntryFilter,
        ) -> Result<(Vec<T>, usize), RepositoryError> {
            if let Some(failure) = &self.failure {
                return Err(failure.to_error());
            }

            let records: Vec<T> = self
                .records
                .lock()?
                .iter()
                .filter(|r| {
                    let header = r.header();
                    header.user_id == user_id && filter.contains(&header.timestamp)
                })
                .cloned()
                .collect();

            Ok(filter.paginate(records, |r| r.header().timestamp))
        }
    }

}
