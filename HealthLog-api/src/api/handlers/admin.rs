//! Debug endpoints for operators, mounted behind the admin gate.
//!
//! Neither endpoint ever reports a secret; only whether one is configured.

use std::env;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use health_log_data::database::{self, DatabaseConfig, DatabaseType};
use health_log_domain::auth::token::{access_token_lifetime, DEFAULT_ISSUER};
use health_log_domain::health::database_component;

use crate::api::error::ErrorBody;
use crate::api::state::AppState;

/// State of the storage backend
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseDebugInfo {
    pub ok: bool,
    /// Whether the database pool was initialized
    pub initialized: bool,
    /// "database" or "in-memory"
    pub storage: String,
    /// Description of the pool, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// Health component status ("healthy", "degraded", "unhealthy")
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Effective configuration with secrets redacted
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigDebugInfo {
    pub ok: bool,
    pub version: String,
    pub app_env: String,
    pub port: u16,
    /// Configured database backend, or the configuration error
    pub database_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<String>,
    pub jwt_secret_configured: bool,
    pub jwt_issuer: String,
    pub access_token_minutes: i64,
    pub gateway_key_configured: bool,
    pub admin_secret_configured: bool,
}

fn status_label<T: Serialize>(status: &T) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Report the storage backend in use
#[utoipa::path(
    get,
    path = "/admin/debug/database",
    responses(
        (status = 200, description = "Storage backend state", body = DatabaseDebugInfo),
        (status = 401, description = "Missing or wrong admin secret", body = ErrorBody),
        (status = 404, description = "Admin endpoints disabled", body = ErrorBody)
    ),
    security(
        ("admin_secret" = [])
    ),
    tag = "admin"
)]
#[instrument(skip_all)]
pub async fn debug_database() -> Json<DatabaseDebugInfo> {
    info!("Admin requested database debug info");

    let connection = database::get_connection_info();
    let component = database_component();
    let initialized = connection.is_some();

    Json(DatabaseDebugInfo {
        ok: true,
        initialized,
        storage: if initialized { "database" } else { "in-memory" }.to_string(),
        connection,
        status: status_label(&component.status),
        details: component.details,
    })
}

/// Report the effective configuration
#[utoipa::path(
    get,
    path = "/admin/debug/config",
    responses(
        (status = 200, description = "Effective configuration", body = ConfigDebugInfo),
        (status = 401, description = "Missing or wrong admin secret", body = ErrorBody),
        (status = 404, description = "Admin endpoints disabled", body = ErrorBody)
    ),
    security(
        ("admin_secret" = [])
    ),
    tag = "admin"
)]
#[instrument(skip_all)]
pub async fn debug_config(State(state): State<AppState>) -> Json<ConfigDebugInfo> {
    info!("Admin requested configuration debug info");

    let (database_type, sqlite_path) = match DatabaseConfig::from_env() {
        Ok(config) => match config.db_type {
            DatabaseType::Sqlite => ("sqlite".to_string(), config.sqlite_path),
            DatabaseType::PostgreSQL => ("postgres".to_string(), None),
        },
        Err(e) => (e.to_string(), None),
    };

    Json(ConfigDebugInfo {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_env: state.config.app_env.clone(),
        port: state.config.port,
        database_type,
        sqlite_path,
        jwt_secret_configured: env::var("JWT_SECRET").map(|s| !s.is_empty()).unwrap_or(false),
        jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        access_token_minutes: access_token_lifetime().num_minutes(),
        gateway_key_configured: state.config.gateway_key.is_set(),
        admin_secret_configured: state.config.admin_secret.is_set(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_log_domain::health::ComponentStatus;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(&ComponentStatus::Degraded), "degraded");
        assert_eq!(status_label(&ComponentStatus::Healthy), "healthy");
    }
}
