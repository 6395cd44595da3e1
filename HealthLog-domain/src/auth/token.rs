use thiserror::Error;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Algorithm, Validation};
use std::env;
use tracing::{debug, error, info};
use chrono::{Duration, Utc};
use crate::auth::Claims;

/// Issuer used when `JWT_ISSUER` is not set
pub const DEFAULT_ISSUER: &str = "health-log-api";

/// Security errors for authentication and token operations
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    /// Expired token
    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    /// Configuration error
    #[error("Security configuration error: {0}")]
    ConfigError(String),

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Secret and issuer used to sign and check tokens
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
}

impl TokenConfig {
    /// Read `JWT_SECRET` and `JWT_ISSUER` from the environment
    pub fn from_env() -> Result<Self, SecurityError> {
        let secret = env::var("JWT_SECRET").map_err(|e| {
            error!("JWT_SECRET environment variable not found: {}", e);
            SecurityError::ConfigError("JWT_SECRET environment variable not found".to_string())
        })?;

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        Ok(Self { secret, issuer })
    }
}

/// Lifetime of an access token, from `ACCESS_TOKEN_EXPIRATION_MINUTES`
pub fn access_token_lifetime() -> Duration {
    let minutes = env::var("ACCESS_TOKEN_EXPIRATION_MINUTES")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(15);

    Duration::minutes(minutes)
}

/// Generate a signed access token for a user
pub fn generate_token_with(config: &TokenConfig, user_id: &str, lifetime: Duration) -> Result<String, SecurityError> {
    let now = Utc::now();
    let expiration = now + lifetime;

    let claims = Claims {
        sub: user_id.to_string(),
        iss: config.issuer.clone(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    ).map_err(|e| {
        error!("Failed to encode JWT token: {}", e);
        SecurityError::TokenValidation(e.to_string())
    })?;

    // Log token generation (but not the token itself)
    info!("Generated access token for user {}", user_id);
    debug!("Token expiration: {}", expiration);

    Ok(token)
}

/// Generate an access token using the environment configuration
pub fn generate_token(user_id: &str) -> Result<String, SecurityError> {
    generate_token_with(&TokenConfig::from_env()?, user_id, access_token_lifetime())
}

/// Validate a JWT token and return the decoded claims
pub fn validate_token_with(config: &TokenConfig, token: &str) -> Result<Claims, SecurityError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[config.issuer.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    ).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => SecurityError::InvalidToken,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => SecurityError::InvalidIssuer,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => SecurityError::TokenValidation("Invalid signature".to_string()),
            _ => SecurityError::TokenValidation(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}

/// Validate a JWT token using the environment configuration
pub fn validate_token(token: &str) -> Result<Claims, SecurityError> {
    validate_token_with(&TokenConfig::from_env()?, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        TokenConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let token = generate_token_with(&config(), "test-user-123", Duration::minutes(15)).unwrap();
        assert!(!token.is_empty());

        let claims = validate_token_with(&config(), &token).unwrap();
        assert_eq!(claims.sub, "test-user-123");
        assert_eq!(claims.iss, "test-issuer");
    }

    #[test]
    fn test_token_expiration() {
        // past the default 60s leeway
        let token = generate_token_with(&config(), "test-user-456", Duration::hours(-1)).unwrap();

        match validate_token_with(&config(), &token) {
            Err(SecurityError::TokenExpired) => {},
            err => panic!("Expected TokenExpired error but got: {:?}", err),
        }
    }

    #[test]
    fn test_wrong_secret_or_issuer() {
        let token = generate_token_with(&config(), "user", Duration::minutes(5)).unwrap();

        let other_secret = TokenConfig { secret: "another".to_string(), ..config() };
        assert!(validate_token_with(&other_secret, &token).is_err());

        let other_issuer = TokenConfig { issuer: "someone-else".to_string(), ..config() };
        assert!(matches!(
            validate_token_with(&other_issuer, &token),
            Err(SecurityError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let result = validate_token_with(&config(), "invalid.token.format");

        match result {
            Err(SecurityError::InvalidToken) | Err(SecurityError::TokenValidation(_)) => {},
            _ => panic!("Expected InvalidToken or TokenValidation error"),
        }
    }
}
