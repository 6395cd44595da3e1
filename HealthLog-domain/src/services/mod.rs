pub mod insights;
pub mod log_entry;
mod payloads;

// Domain services
// One validate-then-insert use case, instantiated per measurement.

// Re-export service traits and factory functions
pub use log_entry::{
    create_default_log_service, ensure_owner, parse_payload, LogBG, LogBP, LogEntryService,
    LogEntryServiceTrait, LogInsulin, LogMeal, LogPayload, LogServiceError, LogWater, LogWeight,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use crate::testing::create_mock_log_service;
