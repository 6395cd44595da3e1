// Repository module structure
pub mod errors;
pub mod filter;
mod in_memory;
mod log_repository;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use filter::EntryFilter;
pub use in_memory::InMemoryStorage;
pub use log_repository::{now_timestamp, LogRepository, LogRepositoryTrait};
pub use storage::DatabaseStorage;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use log_repository::tests;
