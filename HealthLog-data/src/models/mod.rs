// Storage models for every health log entity
pub mod record;

pub mod blood_glucose;
pub mod blood_pressure;
pub mod insulin;
pub mod meal;
pub mod water;
pub mod weight;

pub use record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
pub use blood_glucose::{BloodGlucoseRecord, NewBloodGlucoseRecord};
pub use blood_pressure::{BloodPressureRecord, NewBloodPressureRecord};
pub use insulin::{InsulinRecord, NewInsulinRecord};
pub use meal::{MealRecord, NewMealRecord};
pub use water::{NewWaterRecord, WaterRecord};
pub use weight::{NewWeightRecord, WeightRecord};
