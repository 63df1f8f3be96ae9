use std::fmt;
use std::sync::Arc;

use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use rand::Rng;

use crate::config::SecretManager;
use crate::errors::InternalError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const GENERATED_PASSWORD_LENGTH: usize = 20;
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                  abcdefghijklmnopqrstuvwxyz\
                                  0123456789\
                                  !@#$%^&*()_+-=[]{}|;:,.<>?";

/// One-way password hashing with Argon2id, peppered with a server secret
///
/// Every call draws a fresh salt, so two hashes of the same password differ
/// while both verify.
pub struct PasswordProvider {
    secret_manager: Arc<SecretManager>,
}

impl PasswordProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.secret_manager.pepper().as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash(&self, plaintext: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check a plaintext password against a stored PHC string
    ///
    /// Malformed stored values and initialization failures verify as false.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        match self.argon2() {
            Ok(argon2) => argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::error!("Password verification unavailable: {}", e);
                false
            }
        }
    }

    /// Length policy applied to every password a client chooses
    pub fn check_policy(&self, password: &str) -> Result<(), InternalError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(InternalError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(InternalError::validation(
                "password",
                format!("must be at most {} characters", MAX_PASSWORD_LENGTH),
            ));
        }
        Ok(())
    }

    /// Generate a random password for accounts created without one
    pub fn generate_secure_password(&self) -> String {
        let mut rng = rand::rng();
        (0..GENERATED_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..PASSWORD_CHARSET.len());
                PASSWORD_CHARSET[idx] as char
            })
            .collect()
    }
}

impl fmt::Debug for PasswordProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordProvider")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_pepper(pepper: &str) -> PasswordProvider {
        PasswordProvider::new(Arc::new(SecretManager::new(
            "test-secret-key-minimum-32-characters-long",
            pepper,
        )))
    }

    fn provider() -> PasswordProvider {
        provider_with_pepper("test-pepper-for-unit-tests")
    }

    #[test]
    fn test_hash_produces_argon2id_phc_string() {
        let hash = provider().hash("admin123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("admin123"));
    }

    #[test]
    fn test_two_hashes_differ_and_both_verify() {
        let provider = provider();
        let first = provider.hash("correct horse").unwrap();
        let second = provider.hash("correct horse").unwrap();

        assert_ne!(first, second);
        assert!(provider.verify("correct horse", &first));
        assert!(provider.verify("correct horse", &second));
    }

    #[test]
    fn test_wrong_password_fails() {
        let provider = provider();
        let hash = provider.hash("right").unwrap();
        assert!(!provider.verify("wrong", &hash));
    }

    #[test]
    fn test_malformed_stored_value_is_false() {
        let provider = provider();
        assert!(!provider.verify("anything", "not-a-phc-string"));
        assert!(!provider.verify("anything", ""));
        assert!(!provider.verify("anything", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_different_pepper_does_not_verify() {
        let hash = provider_with_pepper("pepper-number-one-16").hash("secret").unwrap();
        assert!(!provider_with_pepper("pepper-number-two-16").verify("secret", &hash));
    }

    #[test]
    fn test_generate_secure_password() {
        let provider = provider();
        let first = provider.generate_secure_password();
        let second = provider.generate_secure_password();

        assert_eq!(first.len(), 20);
        assert_ne!(first, second);
        assert!(first.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_password_policy_length() {
        let provider = provider();
        assert!(provider.check_policy("short").is_err());
        assert!(provider.check_policy("exactly8").is_ok());
        assert!(provider.check_policy(&"x".repeat(129)).is_err());
    }
}
