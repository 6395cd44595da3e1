use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use health_log_domain::health::{ComponentStatus, SystemStatus};

use crate::api::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok", "degraded", or "error")
    pub status: String,
    /// Application version from the Cargo manifest
    pub version: String,
    /// When the response was generated (RFC 3339)
    pub timestamp: String,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Status of each component by name
    pub components: BTreeMap<String, ComponentHealthStatus>,
    /// Deployment environment
    pub environment: String,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// "ok", "degraded", or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<Instant> = OnceCell::new();

/// Record the server start time; later calls keep the first value
pub fn initialize_server_start_time() {
    SERVER_START_TIME.get_or_init(Instant::now);
}

fn system_status_label(status: SystemStatus) -> &'static str {
    match status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    }
}

fn component_status_label(status: ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::Healthy => "ok",
        ComponentStatus::Degraded => "degraded",
        ComponentStatus::Unhealthy => "error",
    }
}

/// Health check endpoint.
///
/// A degraded system still answers 200 since the in-memory fallback keeps
/// serving requests; only an unhealthy one answers 503.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is up", body = HealthResponse),
        (status = 503, description = "API is not healthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip_all)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    info!("Health check requested");

    let system_health = state.health.get_system_health().await;

    let components = system_health
        .components
        .into_iter()
        .map(|(name, component)| {
            (
                name,
                ComponentHealthStatus {
                    status: component_status_label(component.status).to_string(),
                    message: component.details,
                },
            )
        })
        .collect();

    let response = HealthResponse {
        status: system_status_label(system_health.status).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        uptime: SERVER_START_TIME.get().map(|start| start.elapsed().as_secs()),
        components,
        environment: state.config.app_env.clone(),
    };

    let status = match system_health.status {
        SystemStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        SystemStatus::Healthy | SystemStatus::Degraded => StatusCode::OK,
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ApiConfig;
    use health_log_domain::testing::MockHealthService;

    fn state_with(health: MockHealthService) -> AppState {
        let mut state = AppState::new(ApiConfig::default());
        state.health = Arc::new(health);
        state
    }

    #[tokio::test]
    async fn test_healthy_system() {
        initialize_server_start_time();

        let (status, Json(body)) = health_check(State(state_with(MockHealthService::new()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.components["database"].status, "ok");
        assert_eq!(body.environment, "development");
        assert!(body.uptime.is_some());
    }

    #[tokio::test]
    async fn test_degraded_database_still_serves() {
        let health = MockHealthService::new().with_database_status(ComponentStatus::Degraded);
        let (status, Json(body)) = health_check(State(state_with(health))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "degraded");
    }

    #[tokio::test]
    async fn test_unhealthy_database() {
        let health = MockHealthService::new().with_database_status(ComponentStatus::Unhealthy);
        let (status, Json(body)) = health_check(State(state_with(health))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.components["database"].status, "error");
    }
}
