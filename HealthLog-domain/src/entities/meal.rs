use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// Kind of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Unknown meal type: {}", other)),
        }
    }
}

/// Request payload for logging a meal
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogMealRequest {
    pub meal_type: MealType,

    /// What was eaten
    #[validate(length(min = 1, max = 500, message = "Description must be between 1 and 500 characters"))]
    pub description: String,

    /// Carbohydrates in grams
    #[validate(range(min = 0.0, max = 1000.0, message = "Carbohydrates must be between 0 and 1000 g"))]
    pub carbs_g: Option<f64>,

    #[validate(range(min = 0, max = 10000, message = "Calories must be between 0 and 10000"))]
    pub calories: Option<i64>,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// When the meal was eaten (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

/// A stored meal entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MealEntry {
    pub id: String,
    pub user_id: String,
    pub meal_type: MealType,
    pub description: String,
    pub carbs_g: Option<f64>,
    pub calories: Option<i64>,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}
