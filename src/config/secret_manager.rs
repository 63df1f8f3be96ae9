use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::{ApplicationError, SecretError};
use crate::config::EnvironmentProvider;

const JWT_SECRET_MIN_LENGTH: usize = 32;
const PEPPER_MIN_LENGTH: usize = 16;

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env_provider.clone(), "JWT_SECRET", JWT_SECRET_MIN_LENGTH)?;
        let pepper = Self::load_secret(env_provider, "PASSWORD_PEPPER", PEPPER_MIN_LENGTH)?;

        Ok(Self { jwt_secret, pepper })
    }

    pub fn from_env() -> Result<Self, SecretError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Build from explicit values (tests and embedding)
    pub fn new(jwt_secret: impl Into<String>, pepper: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            pepper: pepper.into(),
        }
    }

    fn load_secret(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
        name: &str,
        min_length: usize,
    ) -> Result<String, SecretError> {
        let value = ConfigSpec::new(env_provider)
            .env_override(name)
            .required(true)
            .load_setting()
            .map_err(|_: ApplicationError| SecretError::missing(name))?
            .value;

        if value.len() < min_length {
            return Err(SecretError::invalid_length(name, min_length, value.len()));
        }

        Ok(value)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Pepper for password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}
