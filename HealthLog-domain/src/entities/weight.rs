use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// Request payload for logging body weight
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogWeightRequest {
    /// Weight in kilograms
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight_kg: f64,

    /// Body fat percentage
    #[validate(range(min = 1.0, max = 70.0, message = "Body fat must be between 1 and 70 percent"))]
    pub body_fat_percentage: Option<f64>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// When the weight was measured (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

/// A stored weight entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct WeightEntry {
    pub id: String,
    pub user_id: String,
    pub weight_kg: f64,
    pub body_fat_percentage: Option<f64>,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}
