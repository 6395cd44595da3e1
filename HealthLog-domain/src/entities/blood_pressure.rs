use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::validation::validate_timestamp;

/// Body position during measurement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BodyPosition {
    Sitting,
    Standing,
    Lying,
}

impl BodyPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPosition::Sitting => "sitting",
            BodyPosition::Standing => "standing",
            BodyPosition::Lying => "lying",
        }
    }
}

impl std::str::FromStr for BodyPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sitting" => Ok(BodyPosition::Sitting),
            "standing" => Ok(BodyPosition::Standing),
            "lying" => Ok(BodyPosition::Lying),
            other => Err(format!("Unknown position: {}", other)),
        }
    }
}

/// Arm the cuff was placed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Right => "right",
        }
    }
}

impl std::str::FromStr for Arm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Arm::Left),
            "right" => Ok(Arm::Right),
            other => Err(format!("Unknown arm: {}", other)),
        }
    }
}

/// Request payload for logging a blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[validate(schema(function = "validate_pressure_relationship", skip_on_field_errors = true))]
pub struct LogBloodPressureRequest {
    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 50, max = 300, message = "Systolic must be between 50 and 300"))]
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 30, max = 200, message = "Diastolic must be between 30 and 200"))]
    pub diastolic: u16,

    /// Optional pulse rate in beats per minute
    #[validate(range(min = 20, max = 250, message = "Pulse must be between 20 and 250"))]
    pub pulse: Option<u16>,

    /// Optional position during measurement
    pub position: Option<BodyPosition>,

    /// Optional arm used for measurement
    pub arm: Option<Arm>,

    /// Optional notes about the reading
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,

    /// When the reading was taken (RFC 3339)
    #[validate(custom = "validate_timestamp")]
    pub timestamp: String,
}

fn validate_pressure_relationship(request: &LogBloodPressureRequest) -> Result<(), ValidationError> {
    if request.systolic <= request.diastolic {
        let mut error = ValidationError::new("systolic_not_above_diastolic");
        error.message = Some("Systolic pressure must be greater than diastolic pressure".into());
        return Err(error);
    }
    Ok(())
}

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    /// Normal blood pressure (systolic < 120 and diastolic < 80)
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    #[serde(rename = "hypertension_stage1")]
    Hypertension1,

    /// Stage 2 Hypertension (systolic ≥ 140 or diastolic ≥ 90)
    #[serde(rename = "hypertension_stage2")]
    Hypertension2,

    /// Hypertensive crisis (systolic ≥ 180 and/or diastolic ≥ 120)
    HypertensiveCrisis,
}

impl std::fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BloodPressureCategory::Normal => write!(f, "Normal"),
            BloodPressureCategory::Elevated => write!(f, "Elevated"),
            BloodPressureCategory::Hypertension1 => write!(f, "Hypertension Stage 1"),
            BloodPressureCategory::Hypertension2 => write!(f, "Hypertension Stage 2"),
            BloodPressureCategory::HypertensiveCrisis => write!(f, "Hypertensive Crisis"),
        }
    }
}

/// A stored blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodPressureEntry {
    /// Unique identifier for the reading
    pub id: String,

    /// Owner of the reading
    pub user_id: String,

    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: Option<u16>,
    pub position: Option<BodyPosition>,
    pub arm: Option<Arm>,

    /// Derived from systolic and diastolic
    pub category: BloodPressureCategory,

    pub notes: Option<String>,

    /// When the reading was taken
    pub timestamp: String,

    /// When the reading was stored
    pub created_at: String,
}
