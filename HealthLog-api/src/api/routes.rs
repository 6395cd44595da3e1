use axum::{http::StatusCode, middleware, response::Response, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::debug;

use health_log_domain::auth::{auth_middleware, error_response};
use health_log_domain::auth::gate::{admin_gate, gateway_gate};

use crate::api::handlers::measurements::{
    BLOOD_PRESSURE_PATH, GLUCOSE_PATH, INSULIN_PATH, MEAL_PATH, WATER_PATH, WEIGHT_PATH,
};
use crate::api::handlers::{self, health};
use crate::api::security::configure_security;
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Create the application router.
///
/// Layout:
/// - `/api/v1/*` measurement endpoints, bearer authentication required;
/// - `/auth/session` session introspection;
/// - `/admin/debug/*` behind the admin secret;
/// - `/health` and the API docs, always open.
///
/// The gateway gate wraps the first three groups.
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let gateway_key = state.config.gateway_key.clone();
    let admin_secret = state.config.admin_secret.clone();

    // Routes that require a bearer token
    let api_routes = Router::new()
        .route(GLUCOSE_PATH, get(handlers::glucose_history).post(handlers::log_glucose))
        .route(
            BLOOD_PRESSURE_PATH,
            get(handlers::blood_pressure_history).post(handlers::log_blood_pressure),
        )
        .route(MEAL_PATH, get(handlers::meal_history).post(handlers::log_meal))
        .route(WATER_PATH, get(handlers::water_history).post(handlers::log_water))
        .route(INSULIN_PATH, get(handlers::insulin_history).post(handlers::log_insulin))
        .route(WEIGHT_PATH, get(handlers::weight_history).post(handlers::log_weight))
        .layer(middleware::from_fn(auth_middleware));

    debug!("API routes configured");

    let admin_routes = Router::new()
        .route("/admin/debug/database", get(handlers::debug_database))
        .route("/admin/debug/config", get(handlers::debug_config))
        .layer(middleware::from_fn_with_state(admin_secret, admin_gate));

    debug!("Admin routes configured");

    let gated_routes = Router::new()
        .route("/auth/session", get(handlers::get_session))
        .merge(api_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(gateway_key, gateway_gate));

    let public_routes = Router::new().route("/health", get(handlers::health_check));

    let app = Router::new()
        .merge(gated_routes)
        .merge(public_routes)
        .fallback(not_found)
        .with_state(state);

    let app = app.merge(configure_swagger_routes());
    debug!("Swagger UI merged");

    let app = configure_security(app).layer(TraceLayer::new_for_http());
    debug!("Security configuration applied");

    health::initialize_server_start_time();

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use health_log_domain::auth::gate::{ADMIN_HEADER, GATEWAY_HEADER};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::ApiConfig;

    fn app(config: ApiConfig) -> Router {
        create_app(AppState::new(config))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_log_endpoint_requires_session() {
        let request = Request::builder()
            .method("POST")
            .uri(WATER_PATH)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"ml":250,"timestamp":"2024-03-01T07:30:00Z"}"#))
            .unwrap();

        let (status, body) = send(app(ApiConfig::default()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_health_is_outside_the_gateway() {
        let config = ApiConfig::default().with_gateway_key("edge");
        let (status, body) = send(app(config), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["components"]["database"].is_object());
    }

    #[tokio::test]
    async fn test_gateway_guards_session_endpoint() {
        let config = ApiConfig::default().with_gateway_key("edge");

        let (status, _) = send(app(config.clone()), get_request("/auth/session")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/auth/session")
            .header(GATEWAY_HEADER, "edge")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(config), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn test_admin_hidden_without_secret() {
        let request = Request::builder()
            .uri("/admin/debug/config")
            .header(ADMIN_HEADER, "guess")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(app(ApiConfig::default()), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_config_redacts_secrets() {
        let config = ApiConfig::default().with_admin_secret("adm1n-s3cret").with_gateway_key("edge");
        let request = Request::builder()
            .uri("/admin/debug/config")
            .header(GATEWAY_HEADER, "edge")
            .header(ADMIN_HEADER, "adm1n-s3cret")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(config), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["admin_secret_configured"], true);
        assert_eq!(body["gateway_key_configured"], true);
        assert!(!body.to_string().contains("adm1n-s3cret"));
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_body() {
        let (status, body) = send(app(ApiConfig::default()), get_request("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = app(ApiConfig::default())
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }
}
