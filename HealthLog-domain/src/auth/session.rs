use axum::http::HeaderMap;
use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::auth::bearer_token;
use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};
use crate::auth::token::{validate_token_with, TokenConfig};

/// The authenticated user as reported by the session endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SessionUser {
    pub id: String,
}

/// Authentication state of the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
    /// Token expiry (RFC 3339)
    pub expires_at: Option<String>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
            expires_at: None,
        }
    }
}

/// Inspect the caller's bearer token without rejecting the request
pub fn session_state(headers: &HeaderMap) -> SessionState {
    let Some(token) = bearer_token(headers) else {
        return SessionState::anonymous();
    };

    let config = match TokenConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            debug!("Cannot check session: {}", e);
            return SessionState::anonymous();
        }
    };

    session_state_with(&config, token)
}

/// Session state for a token checked against an explicit configuration
pub fn session_state_with(config: &TokenConfig, token: &str) -> SessionState {
    match validate_token_with(config, token) {
        Ok(claims) => {
            log_auth_event(
                AuthEvent::new(AuthEventType::SessionCheck, Some(&claims.sub), true)
                    .with_auth_method("jwt"),
            );

            let expires_at = Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true));

            SessionState {
                authenticated: true,
                user: Some(SessionUser { id: claims.sub }),
                expires_at,
            }
        }
        Err(e) => {
            log_auth_event(
                AuthEvent::new(AuthEventType::SessionCheck, None, false)
                    .with_details(e.to_string())
                    .with_auth_method("jwt"),
            );
            SessionState::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::generate_token_with;
    use chrono::Duration;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "session-secret".to_string(),
            issuer: "session-test".to_string(),
        }
    }

    #[test]
    fn test_valid_token_is_authenticated() {
        let token = generate_token_with(&config(), "alice", Duration::minutes(10)).unwrap();
        let state = session_state_with(&config(), &token);

        assert!(state.authenticated);
        assert_eq!(state.user, Some(SessionUser { id: "alice".to_string() }));
        assert!(state.expires_at.unwrap().ends_with('Z'));
    }

    #[test]
    fn test_bad_token_is_anonymous() {
        assert_eq!(session_state_with(&config(), "garbage"), SessionState::anonymous());
    }

    #[test]
    fn test_no_header_is_anonymous() {
        assert_eq!(session_state(&HeaderMap::new()), SessionState::anonymous());
    }
}
