//! Domain layer health check functionality
//! This module provides health check services for the application

use health_log_data::database::{self, DatabaseError};
use std::collections::HashMap;
use async_trait::async_trait;
use serde::Serialize;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced guarantees
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, Serialize)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health service backed by the global database pool
#[derive(Debug, Clone, Default)]
pub struct DefaultHealthService;

#[async_trait]
impl HealthServiceTrait for DefaultHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        get_system_health().await
    }
}

/// Status of the storage backend.
///
/// No pool means entries go to the in-memory fallback, which works but loses
/// data on restart.
pub fn database_component() -> HealthComponent {
    match database::get_db_pool() {
        Ok(pool) => {
            let info = database::describe_pool(&pool);
            let status = if info.contains("error") {
                ComponentStatus::Unhealthy
            } else {
                ComponentStatus::Healthy
            };
            HealthComponent { status, details: Some(info) }
        },
        Err(DatabaseError::PoolNotInitialized) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Database not initialized, using in-memory storage".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e.to_string()),
        },
    }
}

/// Overall status is the worst component status
pub fn overall_status<'a>(components: impl IntoIterator<Item = &'a HealthComponent>) -> SystemStatus {
    let mut status = SystemStatus::Healthy;
    for component in components {
        match component.status {
            ComponentStatus::Unhealthy => return SystemStatus::Unhealthy,
            ComponentStatus::Degraded => status = SystemStatus::Degraded,
            ComponentStatus::Healthy => {}
        }
    }
    status
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let components: HashMap<String, HealthComponent> =
        vec![("database".to_string(), database_component())].into_iter().collect();

    SystemHealth {
        status: overall_status(components.values()),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: ComponentStatus) -> HealthComponent {
        HealthComponent { status, details: None }
    }

    #[tokio::test]
    async fn test_get_system_health() {
        let health = get_system_health().await;
        // Status depends on whether a pool was initialized in this process
        assert!(health.components.contains_key("database"));
    }

    #[test]
    fn test_overall_status_is_worst_component() {
        let healthy = component(ComponentStatus::Healthy);
        let degraded = component(ComponentStatus::Degraded);
        let unhealthy = component(ComponentStatus::Unhealthy);

        assert_eq!(overall_status([&healthy]), SystemStatus::Healthy);
        assert_eq!(overall_status([&healthy, &degraded]), SystemStatus::Degraded);
        assert_eq!(overall_status([&degraded, &unhealthy]), SystemStatus::Unhealthy);
    }
}
