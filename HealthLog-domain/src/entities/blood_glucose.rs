use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// When a glucose reading was taken relative to meals and sleep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum GlucoseContext {
    Fasting,
    BeforeMeal,
    AfterMeal,
    Bedtime,
    Random,
}

impl GlucoseContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlucoseContext::Fasting => "fasting",
            GlucoseContext::BeforeMeal => "before_meal",
            GlucoseContext::AfterMeal => "after_meal",
            GlucoseContext::Bedtime => "bedtime",
            GlucoseContext::Random => "random",
        }
    }
}

impl std::str::FromStr for GlucoseContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fasting" => Ok(GlucoseContext::Fasting),
            "before_meal" => Ok(GlucoseContext::BeforeMeal),
            "after_meal" => Ok(GlucoseContext::AfterMeal),
            "bedtime" => Ok(GlucoseContext::Bedtime),
            "random" => Ok(GlucoseContext::Random),
            other => Err(format!("Unknown glucose context: {}", other)),
        }
    }
}

/// Classification of a glucose value against the usual 70-180 mg/dL target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum GlucoseRange {
    /// Below 70 mg/dL
    Low,
    /// 70 to 180 mg/dL
    InRange,
    /// Above 180 mg/dL
    High,
}

/// Request payload for logging a blood glucose reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LogBloodGlucoseRequest {
    /// Glucose concentration in mg/dL
    #[validate(range(min = 20.0, max = 600.0, message = "Blood glucose must be between 20 and 600 mg/dL"))]
    pub value_mg_dl: f64,

    /// Optional measurement context
    pub context: Option<GlucoseContext>,

    /// Optional notes about the reading
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// When the reading was taken (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

/// A stored blood glucose reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodGlucoseEntry {
    pub id: String,
    pub user_id: String,
    pub value_mg_dl: f64,
    pub context: Option<GlucoseContext>,
    /// Derived from `value_mg_dl`
    pub range: GlucoseRange,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(value_mg_dl: f64) -> LogBloodGlucoseRequest {
        LogBloodGlucoseRequest {
            value_mg_dl,
            context: Some(GlucoseContext::Fasting),
            notes: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_glucose_bounds() {
        assert!(request(20.0).validate().is_ok());
        assert!(request(600.0).validate().is_ok());
        assert!(request(19.9).validate().is_err());
        assert!(request(600.1).validate().is_err());
    }

    #[test]
    fn test_context_uses_snake_case() {
        let parsed: LogBloodGlucoseRequest = serde_json::from_value(serde_json::json!({
            "value_mg_dl": 110,
            "context": "after_meal",
            "timestamp": "2024-03-01T07:30:00Z"
        }))
        .unwrap();
        assert_eq!(parsed.context, Some(GlucoseContext::AfterMeal));

        let unknown = serde_json::from_value::<LogBloodGlucoseRequest>(serde_json::json!({
            "value_mg_dl": 110,
            "context": "lunchtime",
            "timestamp": "2024-03-01T07:30:00Z"
        }));
        assert!(unknown.is_err());
    }
}
