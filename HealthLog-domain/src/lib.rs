// HealthLog Domain
// Validation, use cases and authentication for the HealthLog application

// Services that implement business logic
pub mod services;

// Authentication
#[cfg(feature = "with-axum")]
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use health_log_data::database;

// Re-export the query filter used by history lookups
pub use health_log_data::repository::EntryFilter;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
