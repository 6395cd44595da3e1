pub mod error;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod state;

use axum::Router;

use crate::config::ApiConfig;
use self::state::AppState;

/// Create the application router with the default services
pub fn create_application(config: ApiConfig) -> Router {
    routes::create_app(AppState::new(config))
}
