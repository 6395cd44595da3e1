use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::LogRecord;
use super::errors::RepositoryError;
use super::filter::EntryFilter;

/// In-memory storage for log records, used when no database pool is available.
/// Contents live only as long as the process.
#[derive(Debug, Clone)]
pub struct InMemoryStorage<T: LogRecord> {
    records: Arc<Mutex<HashMap<String, T>>>,
}

impl<T: LogRecord> Default for InMemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LogRecord> InMemoryStorage<T> {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a record in memory
    pub async fn store(&self, record: &T) -> Result<T, RepositoryError> {
        let mut store = self.records.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        let id = record.header().id;
        if store.contains_key(&id) {
            return Err(RepositoryError::Constraint(format!("duplicate id {}", id)));
        }
        store.insert(id, record.clone());
        Ok(record.clone())
    }

    /// Number of stored records
    pub async fn len(&self) -> Result<usize, RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;
        Ok(store.len())
    }

    /// Get one user's records, filtered, sorted by timestamp and paginated
    pub async fn list_for_user(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<(Vec<T>, usize), RepositoryError> {
        let store = self.records.lock().map_err(|e| RepositoryError::MutexLock(e.to_string()))?;

        let records: Vec<T> = store
            .values()
            .filter(|record| {
                let header = record.header();
                header.user_id == user_id && filter.contains(&header.timestamp)
            })
            .cloned()
            .collect();

        Ok(filter.paginate(records, |record| record.header().timestamp))
    }
}
