//! Shared-secret request gates
//!
//! Two gates guard the service:
//! - the gateway gate, which lets a request through only when `x-gateway-key`
//!   carries the configured `GATEWAY_KEY` (no key configured means open);
//! - the admin gate, which hides debug endpoints entirely unless
//!   `ADMIN_SECRET` is configured, and then requires it in `x-admin-secret`.

use std::env;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::error_response;
use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};

/// Header carrying the gateway key
pub const GATEWAY_HEADER: &str = "x-gateway-key";

/// Header carrying the admin secret
pub const ADMIN_HEADER: &str = "x-admin-secret";

/// Compare two byte strings in time independent of where they differ
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// An optional shared secret read from the environment
#[derive(Clone, Default)]
pub struct SharedSecret(Option<Arc<str>>);

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => write!(f, "SharedSecret(<set>)"),
            None => write!(f, "SharedSecret(<unset>)"),
        }
    }
}

impl SharedSecret {
    /// Wrap a secret; empty strings count as unset
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.filter(|s| !s.is_empty()).map(Arc::from))
    }

    /// Read the secret from an environment variable
    pub fn from_env(var: &str) -> Self {
        Self::new(env::var(var).ok())
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Whether a presented value matches. Always false when unset.
    pub fn matches(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (Some(secret), Some(presented)) => constant_time_eq(secret.as_bytes(), presented.as_bytes()),
            _ => false,
        }
    }
}

fn header_value<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Middleware forwarding requests only when the gateway key matches
pub async fn gateway_gate(
    State(key): State<SharedSecret>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !key.is_set() {
        return next.run(req).await;
    }

    if key.matches(header_value(&req, GATEWAY_HEADER)) {
        debug!("Gateway key accepted for {}", req.uri().path());
        return next.run(req).await;
    }

    log_auth_event(
        AuthEvent::new(AuthEventType::GatewayCheck, None, false)
            .with_details("Missing or invalid gateway key")
            .with_resource(req.uri().path())
            .with_auth_method("gateway_key"),
    );

    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

/// Middleware guarding admin endpoints with the admin secret.
///
/// Answers 404 when no secret is configured so the endpoints look absent.
pub async fn admin_gate(
    State(secret): State<SharedSecret>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !secret.is_set() {
        return error_response(StatusCode::NOT_FOUND, "Not found");
    }

    let path = req.uri().path().to_string();

    if secret.matches(header_value(&req, ADMIN_HEADER)) {
        log_auth_event(
            AuthEvent::new(AuthEventType::AdminAccess, None, true)
                .with_resource(path)
                .with_auth_method("shared_secret"),
        );
        return next.run(req).await;
    }

    log_auth_event(
        AuthEvent::new(AuthEventType::AdminAccess, None, false)
            .with_details("Missing or invalid admin secret")
            .with_resource(path)
            .with_auth_method("shared_secret"),
    );

    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret-longer"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_shared_secret_matching() {
        let secret = SharedSecret::new(Some("s3cr3t".to_string()));
        assert!(secret.matches(Some("s3cr3t")));
        assert!(!secret.matches(Some("nope")));
        assert!(!secret.matches(None));

        let unset = SharedSecret::new(Some(String::new()));
        assert!(!unset.is_set());
        assert!(!unset.matches(Some("")));
    }

    fn gated(layer: fn(SharedSecret) -> Router, secret: Option<&str>) -> Router {
        layer(SharedSecret::new(secret.map(String::from)))
    }

    fn gateway_app(secret: SharedSecret) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(secret, gateway_gate))
    }

    fn admin_app(secret: SharedSecret) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(secret, admin_gate))
    }

    async fn status(app: Router, header: Option<(&str, &str)>) -> StatusCode {
        let mut builder = Request::builder().uri("/");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_gateway_gate() {
        assert_eq!(status(gated(gateway_app, None), None).await, StatusCode::OK);
        assert_eq!(status(gated(gateway_app, Some("k")), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(gated(gateway_app, Some("k")), Some((GATEWAY_HEADER, "wrong"))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(gated(gateway_app, Some("k")), Some((GATEWAY_HEADER, "k"))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_admin_gate() {
        assert_eq!(
            status(gated(admin_app, None), Some((ADMIN_HEADER, "anything"))).await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(gated(admin_app, Some("a")), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(gated(admin_app, Some("a")), Some((ADMIN_HEADER, "a"))).await,
            StatusCode::OK
        );
    }
}
