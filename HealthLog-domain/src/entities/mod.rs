// Domain entities and value objects
pub mod blood_glucose;
pub mod blood_pressure;
pub mod conversions;
pub mod insulin;
pub mod meal;
pub mod validation;
pub mod water;
pub mod weight;

// Re-export common types for easier imports
pub use blood_glucose::{BloodGlucoseEntry, GlucoseContext, GlucoseRange, LogBloodGlucoseRequest};
pub use blood_pressure::{Arm, BloodPressureCategory, BloodPressureEntry, BodyPosition, LogBloodPressureRequest};
pub use insulin::{InsulinEntry, InsulinType, LogInsulinRequest};
pub use meal::{LogMealRequest, MealEntry, MealType};
pub use water::{LogWaterRequest, WaterEntry};
pub use weight::{LogWeightRequest, WeightEntry};
