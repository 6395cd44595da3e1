//! Authentication module for the HealthLog API
//!
//! Provides bearer-token authentication for the log endpoints, session
//! introspection, and the shared-secret gates in front of the service.

use axum::{
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    body::Body,
    Json,
};
use tracing::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

// JWT handling
pub mod token;

// Shared-secret gates
pub mod gate;

// Session introspection
pub mod session;

// Include logging module
pub mod logging;

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// User information extracted from authenticated requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UserInfo {
    /// User ID
    pub user_id: String,
    /// Authentication source (e.g. "jwt")
    pub auth_source: String,
}

/// JSON error body shared by the gates and the middleware
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": message }))).into_response()
}

/// Bearer token from the Authorization header, if present and well formed
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    let request_path = req.uri().path().to_string();
    let start_time = std::time::Instant::now();

    let failure = |details: String| {
        let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
            .with_details(details)
            .with_resource(request_path.clone())
            .with_duration(start_time.elapsed().as_millis() as u64)
            .with_auth_method("jwt");

        log_auth_event(event);

        error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
    };

    let Some(token) = bearer_token(req.headers()) else {
        debug!("Missing or malformed Authorization header");
        return failure("Missing or malformed Authorization header".to_string());
    };

    match token::validate_token(token) {
        Ok(claims) if claims.sub.trim().is_empty() => {
            warn!("Rejected bearer token without a subject");
            failure("Token has no subject".to_string())
        },
        Ok(claims) => {
            debug!("Token validated for user: {}", claims.sub);

            let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.sub), true)
                .with_resource(request_path.clone())
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");

            log_auth_event(event);

            let user_info = UserInfo {
                user_id: claims.sub.clone(),
                auth_source: "jwt".to_string(),
            };

            req.extensions_mut().insert(user_info);
            req.extensions_mut().insert(claims);

            next.run(req).await
        },
        Err(e) => {
            warn!("Rejected bearer token: {}", e);
            failure(e.to_string())
        }
    }
}
