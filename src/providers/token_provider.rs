use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::SecretManager;
use crate::errors::internal::AccessError;
use crate::errors::InternalError;
use crate::types::internal::auth::Claims;

/// JWT issuance and validation (HS256)
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration: Duration,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, jwt_expiration: Duration) -> Self {
        Self {
            secret_manager,
            jwt_expiration,
        }
    }

    /// Token lifetime in seconds, as reported to clients
    pub fn expires_in(&self) -> i64 {
        self.jwt_expiration.as_secs() as i64
    }

    /// Generate a JWT for the given user
    pub fn generate_jwt(&self, user_id: i32, is_admin: bool) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.expires_in(),
            iat: now,
            is_admin,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(AccessError::ExpiredToken),
            _ => {
                tracing::debug!("JWT rejected: {}", e);
                InternalError::from(AccessError::invalid_token("invalid signature or malformed"))
            }
        })?;

        Ok(token_data.claims)
    }

    /// Parse the numeric user id out of the `sub` claim
    pub fn subject_user_id(claims: &Claims) -> Result<i32, InternalError> {
        claims
            .sub
            .parse::<i32>()
            .map_err(|_| InternalError::from(AccessError::invalid_token("subject is not a user id")))
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration", &self.jwt_expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn provider() -> TokenProvider {
        TokenProvider::new(
            Arc::new(SecretManager::new(SECRET, "test-pepper-for-unit-tests")),
            Duration::from_secs(15 * 60),
        )
    }

    #[test]
    fn test_generate_and_validate_roundtrip_claims() {
        let provider = provider();
        let before = Utc::now().timestamp();
        let token = provider.generate_jwt(42, true).unwrap();

        let claims = provider.validate_jwt(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.is_admin);
        assert!(claims.iat >= before);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(TokenProvider::subject_user_id(&claims).unwrap(), 42);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let provider = provider();
        let mut token = provider.generate_jwt(1, false).unwrap();
        token.push('x');

        assert!(matches!(
            provider.validate_jwt(&token),
            Err(InternalError::Access(AccessError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = TokenProvider::new(
            Arc::new(SecretManager::new("another-secret-key-minimum-32-characters", "test-pepper-for-unit-tests")),
            Duration::from_secs(60),
        );
        let token = other.generate_jwt(1, true).unwrap();

        assert!(provider().validate_jwt(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            exp: now - 3600,
            iat: now - 7200,
            is_admin: false,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            provider().validate_jwt(&token),
            Err(InternalError::Access(AccessError::ExpiredToken))
        ));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            exp: 0,
            iat: 0,
            is_admin: false,
        };
        assert!(TokenProvider::subject_user_id(&claims).is_err());
    }
}
