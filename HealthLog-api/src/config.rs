//! Server configuration read from the environment

use std::env;

use health_log_domain::auth::gate::SharedSecret;
use thiserror::Error;

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Settings for the HTTP layer
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listening port
    pub port: u16,
    /// Deployment environment name, reported by health and debug endpoints
    pub app_env: String,
    /// Secret guarding the admin debug endpoints (`ADMIN_SECRET`)
    pub admin_secret: SharedSecret,
    /// Key expected from the fronting gateway (`GATEWAY_KEY`)
    pub gateway_key: SharedSecret,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_env: "development".to_string(),
            admin_secret: SharedSecret::default(),
            gateway_key: SharedSecret::default(),
        }
    }
}

impl ApiConfig {
    /// Read `PORT`, `APP_ENV`, `ADMIN_SECRET` and `GATEWAY_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            admin_secret: SharedSecret::from_env("ADMIN_SECRET"),
            gateway_key: SharedSecret::from_env("GATEWAY_KEY"),
        })
    }

    pub fn with_admin_secret(mut self, secret: &str) -> Self {
        self.admin_secret = SharedSecret::new(Some(secret.to_string()));
        self
    }

    pub fn with_gateway_key(mut self, key: &str) -> Self {
        self.gateway_key = SharedSecret::new(Some(key.to_string()));
        self
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidPort(value.to_string())),
        Ok(port) => Ok(port),
    }
}
