pub mod admin;
pub mod entries;
pub mod health;
pub mod measurements;
pub mod session;

// Re-export handlers for easier imports
pub use admin::{debug_config, debug_database};
pub use health::health_check;
pub use measurements::{
    blood_pressure_history, glucose_history, insulin_history, log_blood_pressure, log_glucose,
    log_insulin, log_meal, log_water, log_weight, meal_history, water_history, weight_history,
};
pub use session::get_session;
