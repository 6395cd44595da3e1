// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use health_log_data::repository::tests::{MockFailure, MockLogRepository};

use std::sync::RwLock;
use async_trait::async_trait;

use health_log_data::models::LogRecord;
use health_log_data::repository::{now_timestamp, EntryFilter};

use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::log_entry::{LogEntryServiceTrait, LogPayload, LogServiceError};

/// Mock implementation of the LogEntryServiceTrait for testing.
///
/// Stores entries in memory and can be told to fail at a given stage.
pub struct MockLogService<P: LogPayload> {
    entries: RwLock<Vec<P::Entry>>,
    failure: Option<LogServiceError>,
    validation_failure: bool,
}

impl<P: LogPayload> Default for MockLogService<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LogPayload> MockLogService<P> {
    /// Create a new mock log service
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            failure: None,
            validation_failure: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.validation_failure = true;
        self
    }

    /// Configure the mock to fail every log and history call with an error
    pub fn with_failure(mut self, failure: LogServiceError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Add pre-defined entries to the mock
    pub fn with_entries(self, entries: Vec<P::Entry>) -> Self {
        if let Ok(mut stored) = self.entries.write() {
            stored.extend(entries);
        }
        self
    }

    /// Entries logged so far
    pub fn entries(&self) -> Vec<P::Entry> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl<P: LogPayload> LogEntryServiceTrait<P> for MockLogService<P> {
    fn validate(&self, _payload: &P) -> Result<(), LogServiceError> {
        if self.validation_failure {
            Err(LogServiceError::Validation(
                "Validation failed - mock is configured to fail validation".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    async fn log(&self, user_id: &str, payload: P) -> Result<P::Entry, LogServiceError> {
        self.validate(&payload)?;
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let timestamp = payload.timestamp().to_string();
        let new = payload.into_new_record(user_id.to_string(), timestamp);
        let record = P::Record::from_new(uuid::Uuid::new_v4().to_string(), now_timestamp(), new);
        let entry = P::into_entry(record).map_err(LogServiceError::Store)?;

        self.entries
            .write()
            .map_err(|e| LogServiceError::Store(e.to_string()))?
            .push(entry.clone());

        Ok(entry)
    }

    async fn history(&self, _user_id: &str, filter: EntryFilter) -> Result<(Vec<P::Entry>, usize), LogServiceError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let entries = self.entries();
        let total = entries.len();
        let offset = filter.offset.unwrap_or(0);
        let limit = filter.limit.unwrap_or(total);

        Ok((entries.into_iter().skip(offset).take(limit).collect(), total))
    }
}

/// Create a mock log service for testing
pub fn create_mock_log_service<P: LogPayload>() -> MockLogService<P> {
    MockLogService::new()
}

/// Mock implementation of the HealthServiceTrait for testing
#[derive(Debug, Clone)]
pub struct MockHealthService {
    database: ComponentStatus,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a mock reporting a healthy database
    pub fn new() -> Self {
        Self { database: ComponentStatus::Healthy }
    }

    /// Report the database with the given status
    pub fn with_database_status(mut self, status: ComponentStatus) -> Self {
        self.database = status;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let component = HealthComponent {
            status: self.database,
            details: Some("mock database".to_string()),
        };

        let status = match self.database {
            ComponentStatus::Healthy => SystemStatus::Healthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
        };

        SystemHealth {
            status,
            components: vec![("database".to_string(), component)].into_iter().collect(),
        }
    }
}
