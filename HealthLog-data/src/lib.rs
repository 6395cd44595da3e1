// HealthLog Data
// Storage for health log records: table mappings, connection pools and repositories

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
