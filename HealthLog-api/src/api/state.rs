use std::sync::Arc;

use health_log_domain::entities::{
    LogBloodGlucoseRequest, LogBloodPressureRequest, LogInsulinRequest, LogMealRequest,
    LogWaterRequest, LogWeightRequest,
};
use health_log_domain::health::{DefaultHealthService, HealthServiceTrait};
use health_log_domain::services::{create_default_log_service, LogEntryServiceTrait};

use crate::config::ApiConfig;

/// Service type for dependency injection
pub type LogService<P> = Arc<dyn LogEntryServiceTrait<P>>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub glucose: LogService<LogBloodGlucoseRequest>,
    pub blood_pressure: LogService<LogBloodPressureRequest>,
    pub meals: LogService<LogMealRequest>,
    pub water: LogService<LogWaterRequest>,
    pub insulin: LogService<LogInsulinRequest>,
    pub weight: LogService<LogWeightRequest>,
    pub health: Arc<dyn HealthServiceTrait>,
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by the default repositories
    pub fn new(config: ApiConfig) -> Self {
        Self {
            glucose: Arc::new(create_default_log_service::<LogBloodGlucoseRequest>()),
            blood_pressure: Arc::new(create_default_log_service::<LogBloodPressureRequest>()),
            meals: Arc::new(create_default_log_service::<LogMealRequest>()),
            water: Arc::new(create_default_log_service::<LogWaterRequest>()),
            insulin: Arc::new(create_default_log_service::<LogInsulinRequest>()),
            weight: Arc::new(create_default_log_service::<LogWeightRequest>()),
            health: Arc::new(DefaultHealthService),
            config,
        }
    }
}
