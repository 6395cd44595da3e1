use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// Insulin action profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum InsulinType {
    Rapid,
    Short,
    Intermediate,
    Long,
    Mixed,
}

impl InsulinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsulinType::Rapid => "rapid",
            InsulinType::Short => "short",
            InsulinType::Intermediate => "intermediate",
            InsulinType::Long => "long",
            InsulinType::Mixed => "mixed",
        }
    }
}

impl std::str::FromStr for InsulinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rapid" => Ok(InsulinType::Rapid),
            "short" => Ok(InsulinType::Short),
            "intermediate" => Ok(InsulinType::Intermediate),
            "long" => Ok(InsulinType::Long),
            "mixed" => Ok(InsulinType::Mixed),
            other => Err(format!("Unknown insulin type: {}", other)),
        }
    }
}

/// Request payload for logging an insulin dose
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogInsulinRequest {
    /// Dose in units
    #[validate(range(min = 0.1, max = 300.0, message = "Insulin dose must be between 0.1 and 300 units"))]
    pub units: f64,

    pub insulin_type: InsulinType,

    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// When the dose was taken (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

/// A stored insulin dose
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct InsulinEntry {
    pub id: String,
    pub user_id: String,
    pub units: f64,
    pub insulin_type: InsulinType,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(units: f64) -> LogInsulinRequest {
        LogInsulinRequest {
            units,
            insulin_type: InsulinType::Rapid,
            notes: None,
            timestamp: "2024-03-01T07:30:00Z".to_string(),
        }
    }

    #[test]
    fn test_dose_bounds() {
        assert!(request(0.1).validate().is_ok());
        assert!(request(300.0).validate().is_ok());
        assert!(request(0.0).validate().is_err());
        assert!(request(301.0).validate().is_err());
    }

    #[test]
    fn test_unknown_insulin_type_fails_to_parse() {
        let parsed = serde_json::from_value::<LogInsulinRequest>(serde_json::json!({
            "units": 4,
            "insulin_type": "ultra",
            "timestamp": "2024-03-01T07:30:00Z"
        }));
        assert!(parsed.is_err());
    }
}
