use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// Request payload for logging water intake
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogWaterRequest {
    /// Amount in millilitres
    #[validate(range(min = 1, max = 10000, message = "Water amount must be between 1 and 10000 ml"))]
    pub ml: i64,

    /// When the water was drunk (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

/// A stored water intake entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct WaterEntry {
    pub id: String,
    pub user_id: String,
    pub ml: i64,
    pub timestamp: String,
    pub created_at: String,
}
