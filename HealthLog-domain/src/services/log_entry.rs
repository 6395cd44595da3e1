//! The log-entry use case shared by every health measurement.
//!
//! A payload is checked for ownership, parsed, validated against its schema,
//! stamped with the session user and a normalized timestamp, and inserted
//! through a repository. Each measurement only supplies its payload type; the
//! flow itself is written once in [`LogEntryService`].

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use validator::Validate;

use health_log_data::models::LogRecord;
use health_log_data::models::{
    BloodGlucoseRecord, BloodPressureRecord, InsulinRecord, MealRecord, WaterRecord, WeightRecord,
};
use health_log_data::repository::{EntryFilter, LogRepository, LogRepositoryTrait, RepositoryError};

use crate::entities::validation::{format_validation_errors, normalize_timestamp};
use crate::entities::{
    LogBloodGlucoseRequest, LogBloodPressureRequest, LogInsulinRequest, LogMealRequest,
    LogWaterRequest, LogWeightRequest,
};

/// Keys a client might use to name an owner in the request body
pub const OWNER_KEYS: [&str; 2] = ["user_id", "userId"];

/// Log entry service errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogServiceError {
    /// Payload failed parsing or schema validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// No user id in the session
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Payload names a different owner than the session
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The store refused the row
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// The store failed
    #[error("Store error: {0}")]
    Store(String),
}

impl LogServiceError {
    /// The message without the error kind prefix
    pub fn message(&self) -> &str {
        match self {
            LogServiceError::Validation(msg)
            | LogServiceError::Unauthenticated(msg)
            | LogServiceError::Forbidden(msg)
            | LogServiceError::Rejected(msg)
            | LogServiceError::Store(msg) => msg,
        }
    }
}

/// A request payload that can be logged as a health entry
pub trait LogPayload: DeserializeOwned + Validate + Clone + Debug + Send + Sync + 'static {
    /// Storage record the payload is inserted as
    type Record: LogRecord;

    /// Entry returned to clients
    type Entry: Serialize + Clone + Debug + Send + Sync + 'static;

    /// Name used in log lines
    const KIND: &'static str;

    /// Client-supplied timestamp, not yet normalized
    fn timestamp(&self) -> &str;

    /// Build the insert payload for an owner and normalized timestamp
    fn into_new_record(self, user_id: String, timestamp: String) -> <Self::Record as LogRecord>::New;

    /// Build the client-facing entry from a stored record
    fn into_entry(record: Self::Record) -> Result<Self::Entry, String>;
}

/// Reject a body that names an owner other than the session user.
///
/// A missing or null owner field is fine; the owner always comes from the
/// session.
pub fn ensure_owner(body: &Value, session_user: &str) -> Result<(), LogServiceError> {
    for key in OWNER_KEYS {
        match body.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(claimed)) if claimed == session_user => {}
            Some(other) => {
                warn!("Request body names owner {} which does not match the session", other);
                return Err(LogServiceError::Forbidden(format!(
                    "{} does not match the authenticated user",
                    key
                )));
            }
        }
    }
    Ok(())
}

/// Check ownership on a raw JSON body and deserialize it into a payload
pub fn parse_payload<P: LogPayload>(body: Value, session_user: &str) -> Result<P, LogServiceError> {
    if !body.is_object() {
        return Err(LogServiceError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }

    ensure_owner(&body, session_user)?;

    serde_json::from_value(body).map_err(|e| LogServiceError::Validation(e.to_string()))
}

/// Refuse an empty session user id
fn require_user(user_id: &str) -> Result<(), LogServiceError> {
    if user_id.trim().is_empty() {
        warn!("Request reached the log service without a session user");
        return Err(LogServiceError::Unauthenticated("No authenticated user".to_string()));
    }
    Ok(())
}

/// Map repository errors to service errors
fn map_repo_error(err: RepositoryError) -> LogServiceError {
    if err.is_rejection() {
        LogServiceError::Rejected(err.to_string())
    } else {
        LogServiceError::Store(err.to_string())
    }
}

/// Trait for log entry service operations
#[async_trait]
pub trait LogEntryServiceTrait<P: LogPayload>: Send + Sync {
    /// Validate a payload against its schema
    fn validate(&self, payload: &P) -> Result<(), LogServiceError>;

    /// Validate and store a payload for the given user
    async fn log(&self, user_id: &str, payload: P) -> Result<P::Entry, LogServiceError>;

    /// Get a page of the user's entries and the total matching the filter
    async fn history(&self, user_id: &str, filter: EntryFilter) -> Result<(Vec<P::Entry>, usize), LogServiceError>;
}

/// Validate-then-insert use case for one kind of payload
pub struct LogEntryService<P, R> {
    repository: R,
    _payload: PhantomData<fn() -> P>,
}

impl<P: LogPayload, R: LogRepositoryTrait<P::Record>> LogEntryService<P, R> {
    /// Create a new log entry service
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            _payload: PhantomData,
        }
    }
}

#[async_trait]
impl<P, R> LogEntryServiceTrait<P> for LogEntryService<P, R>
where
    P: LogPayload,
    R: LogRepositoryTrait<P::Record>,
{
    fn validate(&self, payload: &P) -> Result<(), LogServiceError> {
        payload
            .validate()
            .map_err(|errors| LogServiceError::Validation(format_validation_errors(&errors)))
    }

    async fn log(&self, user_id: &str, payload: P) -> Result<P::Entry, LogServiceError> {
        require_user(user_id)?;

        self.validate(&payload).map_err(|e| {
            debug!("Rejected {} payload: {}", P::KIND, e);
            e
        })?;

        let timestamp = normalize_timestamp(payload.timestamp()).map_err(LogServiceError::Validation)?;
        let new = payload.into_new_record(user_id.to_string(), timestamp);

        let record = self.repository.create(new).await.map_err(|e| {
            error!("Failed to store {} entry: {}", P::KIND, e);
            map_repo_error(e)
        })?;

        info!("Logged {} entry {} for user {}", P::KIND, record.header().id, user_id);

        P::into_entry(record).map_err(LogServiceError::Store)
    }

    async fn history(&self, user_id: &str, mut filter: EntryFilter) -> Result<(Vec<P::Entry>, usize), LogServiceError> {
        require_user(user_id)?;

        filter.start = filter
            .start
            .as_deref()
            .map(normalize_timestamp)
            .transpose()
            .map_err(LogServiceError::Validation)?;
        filter.end = filter
            .end
            .as_deref()
            .map(normalize_timestamp)
            .transpose()
            .map_err(LogServiceError::Validation)?;

        if let (Some(start), Some(end)) = (&filter.start, &filter.end) {
            if start > end {
                return Err(LogServiceError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        let (records, total) = self
            .repository
            .list_for_user(user_id, &filter)
            .await
            .map_err(map_repo_error)?;

        let entries = records
            .into_iter()
            .map(P::into_entry)
            .collect::<Result<Vec<_>, _>>()
            .map_err(LogServiceError::Store)?;

        Ok((entries, total))
    }
}

/// Log a blood glucose reading
pub type LogBG = LogEntryService<LogBloodGlucoseRequest, LogRepository<BloodGlucoseRecord>>;
/// Log a blood pressure reading
pub type LogBP = LogEntryService<LogBloodPressureRequest, LogRepository<BloodPressureRecord>>;
/// Log a meal
pub type LogMeal = LogEntryService<LogMealRequest, LogRepository<MealRecord>>;
/// Log water intake
pub type LogWater = LogEntryService<LogWaterRequest, LogRepository<WaterRecord>>;
/// Log an insulin dose
pub type LogInsulin = LogEntryService<LogInsulinRequest, LogRepository<InsulinRecord>>;
/// Log a body weight measurement
pub type LogWeight = LogEntryService<LogWeightRequest, LogRepository<WeightRecord>>;

/// Create a log service backed by the default repository
pub fn create_default_log_service<P: LogPayload>() -> LogEntryService<P, LogRepository<P::Record>> {
    LogEntryService::new(LogRepository::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use health_log_data::repository::tests::{MockFailure, MockLogRepository};
    use serde_json::json;

    use crate::entities::{BloodPressureCategory, LogWaterRequest};

    fn water_service(repo: MockLogRepository<WaterRecord>) -> LogEntryService<LogWaterRequest, MockLogRepository<WaterRecord>> {
        LogEntryService::new(repo)
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(&json!({ "ml": 1 }), "alice").is_ok());
        assert!(ensure_owner(&json!({ "user_id": "alice" }), "alice").is_ok());
        assert!(ensure_owner(&json!({ "userId": null }), "alice").is_ok());

        assert!(matches!(
            ensure_owner(&json!({ "user_id": "bob" }), "alice"),
            Err(LogServiceError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_owner(&json!({ "userId": 42 }), "alice"),
            Err(LogServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn test_parse_payload_reports_missing_fields() {
        let err = parse_payload::<LogWaterRequest>(json!({ "ml": 250 }), "alice").unwrap_err();
        assert!(matches!(err, LogServiceError::Validation(ref msg) if msg.contains("timestamp")));

        let err = parse_payload::<LogWaterRequest>(json!([1, 2]), "alice").unwrap_err();
        assert!(matches!(err, LogServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_log_water_normalizes_and_sets_owner() {
        let service = water_service(MockLogRepository::new());
        let payload = parse_payload::<LogWaterRequest>(
            json!({ "ml": 1800, "timestamp": "2024-03-01T09:30:00+02:00", "user_id": "alice" }),
            "alice",
        )
        .unwrap();

        let entry = service.log("alice", payload).await.unwrap();

        assert_eq!(entry.user_id, "alice");
        assert_eq!(entry.ml, 1800);
        assert_eq!(entry.timestamp, "2024-03-01T07:30:00.000Z");
        assert!(!entry.id.is_empty());
    }

    #[tokio::test]
    async fn test_log_rejects_invalid_payload_before_store() {
        let repo = MockLogRepository::new();
        let service = water_service(repo);

        let err = service
            .log("alice", LogWaterRequest { ml: -5, timestamp: Utc::now().to_rfc3339() })
            .await
            .unwrap_err();

        assert!(matches!(err, LogServiceError::Validation(ref msg) if msg.starts_with("ml:")));
        assert!(service.repository.stored().is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_are_classified() {
        let payload = LogWaterRequest { ml: 500, timestamp: Utc::now().to_rfc3339() };

        let rejected = water_service(MockLogRepository::failing(MockFailure::Rejected("CHECK".to_string())));
        assert!(matches!(
            rejected.log("alice", payload.clone()).await,
            Err(LogServiceError::Rejected(_))
        ));

        let down = water_service(MockLogRepository::failing(MockFailure::Unavailable("down".to_string())));
        assert!(matches!(down.log("alice", payload).await, Err(LogServiceError::Store(_))));
    }

    #[tokio::test]
    async fn test_blood_pressure_validation_messages() {
        let service: LogEntryService<LogBloodPressureRequest, _> =
            LogEntryService::new(MockLogRepository::<BloodPressureRecord>::new());

        let payload = |systolic: u16, diastolic: u16| LogBloodPressureRequest {
            systolic,
            diastolic,
            pulse: None,
            position: None,
            arm: None,
            notes: None,
            timestamp: Utc::now().to_rfc3339(),
        };

        let entry = service.log("alice", payload(120, 80)).await.unwrap();
        assert_eq!(entry.category, BloodPressureCategory::Hypertension1);

        let err = service.validate(&payload(30, 20)).unwrap_err();
        assert!(err.message().contains("Systolic must be between 50 and 300"));

        let err = service.validate(&payload(120, 10)).unwrap_err();
        assert!(err.message().contains("diastolic:"));

        let err = service.validate(&payload(100, 100)).unwrap_err();
        assert_eq!(err.message(), "Systolic pressure must be greater than diastolic pressure");
    }

    #[tokio::test]
    async fn test_history_normalizes_bounds_and_checks_order() {
        let service = water_service(MockLogRepository::new());
        for (ml, ts) in [(250, "2024-01-01T08:00:00Z"), (500, "2024-01-05T08:00:00Z")] {
            service
                .log("alice", LogWaterRequest { ml, timestamp: ts.to_string() })
                .await
                .unwrap();
        }

        let filter = EntryFilter {
            start: Some("2024-01-03T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        let (entries, total) = service.history("alice", filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(entries[0].ml, 500);

        let inverted = EntryFilter {
            start: Some("2024-02-01T00:00:00Z".to_string()),
            end: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.history("alice", inverted).await,
            Err(LogServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_user_is_unauthenticated() {
        let service = water_service(MockLogRepository::new());
        let payload = LogWaterRequest { ml: 250, timestamp: Utc::now().to_rfc3339() };

        assert!(matches!(
            service.log(" ", payload).await,
            Err(LogServiceError::Unauthenticated(_))
        ));
        assert!(matches!(
            service.history("", EntryFilter::default()).await,
            Err(LogServiceError::Unauthenticated(_))
        ));
        assert!(service.repository.stored().is_empty());
    }

    #[tokio::test]
    async fn test_history_pages_existing_records() {
        let stored = ["2024-01-01T08:00:00.000Z", "2024-01-02T08:00:00.000Z", "2024-01-03T08:00:00.000Z"]
            .iter()
            .enumerate()
            .map(|(i, ts)| WaterRecord {
                id: format!("w{}", i),
                user_id: if i == 1 { "bob".to_string() } else { "alice".to_string() },
                ml: 100 * (i as i64 + 1),
                timestamp: ts.to_string(),
                created_at: ts.to_string(),
            })
            .collect();
        let service = water_service(MockLogRepository::with_records(stored));

        let filter = EntryFilter { limit: Some(1), sort_desc: Some(true), ..Default::default() };
        let (entries, total) = service.history("alice", filter).await.unwrap();

        assert_eq!(total, 2);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "w2");
    }
}
