use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

/// Types of authentication events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthEventType {
    /// Bearer token checked by the auth middleware
    TokenValidation,
    /// Session introspection
    SessionCheck,
    /// Shared-secret check on an admin endpoint
    AdminAccess,
    /// Gateway key check on an inbound request
    GatewayCheck,
    /// Request named another user's data
    AccessDenied,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
            AuthEventType::SessionCheck => write!(f, "SESSION_CHECK"),
            AuthEventType::AdminAccess => write!(f, "ADMIN_ACCESS"),
            AuthEventType::GatewayCheck => write!(f, "GATEWAY_CHECK"),
            AuthEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Type of authentication event
    pub event_type: AuthEventType,
    /// User ID (if available)
    pub user_id: Option<String>,
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
    /// Whether the event was successful
    pub success: bool,
    /// Additional details about the event
    pub details: Option<String>,
    /// The resource being accessed (if applicable)
    pub resource: Option<String>,
    /// Duration of the operation in milliseconds (if applicable)
    pub duration_ms: Option<u64>,
    /// Authentication method used (jwt, shared_secret, gateway_key)
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, user_id: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user_id: user_id.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            resource: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    /// Set the details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the resource
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the authentication method
    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Log an authentication event
pub fn log_auth_event(event: AuthEvent) {
    let user_id = event.user_id.as_deref().unwrap_or("anonymous");
    let details = event.details.as_deref().unwrap_or("");
    let resource = event.resource.as_deref().unwrap_or("-");
    let method = event.auth_method.as_deref().unwrap_or("-");

    if event.success {
        info!(
            event_type = %event.event_type,
            user_id,
            resource,
            method,
            duration_ms = event.duration_ms,
            "AUTH-LOG SUCCESS {}",
            details
        );
    } else {
        warn!(
            event_type = %event.event_type,
            user_id,
            resource,
            method,
            duration_ms = event.duration_ms,
            "AUTH-LOG FAILURE {}",
            details
        );
    }
}

/// Log an ownership mismatch on a write
pub fn log_access_denied(user_id: &str, resource: &str, reason: &str) {
    let event = AuthEvent::new(AuthEventType::AccessDenied, Some(user_id), false)
        .with_resource(resource)
        .with_details(reason);

    log_auth_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_auth_event() {
        let event = AuthEvent::new(AuthEventType::AdminAccess, Some("user123"), true)
            .with_details("Admin secret accepted")
            .with_resource("/admin/debug/config")
            .with_duration(3)
            .with_auth_method("shared_secret");

        assert_eq!(event.event_type, AuthEventType::AdminAccess);
        assert_eq!(event.user_id, Some("user123".to_string()));
        assert!(event.success);
        assert_eq!(event.details, Some("Admin secret accepted".to_string()));
        assert_eq!(event.resource, Some("/admin/debug/config".to_string()));
        assert_eq!(event.duration_ms, Some(3));
        assert_eq!(event.auth_method, Some("shared_secret".to_string()));
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(AuthEventType::TokenValidation.to_string(), "TOKEN_VALIDATION");
        assert_eq!(AuthEventType::GatewayCheck.to_string(), "GATEWAY_CHECK");
        assert_eq!(AuthEventType::AccessDenied.to_string(), "ACCESS_DENIED");
    }
}
