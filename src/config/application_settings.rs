use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Application-level settings: token lifetime, bootstrap admin, demo data
pub struct ApplicationSettings {
    jwt_expiration: Duration,
    admin_username: String,
    admin_email: String,
    admin_password: Option<String>,
    seed_demo_courses: bool,
}

impl ApplicationSettings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ApplicationError> {
        let jwt_minutes = ConfigSpec::new(env_provider.clone())
            .env_override("JWT_EXPIRATION_MINUTES")
            .default_value("15")
            .load_setting()?
            .value;
        let jwt_expiration = ConfigSpec::parse_duration_minutes(&jwt_minutes, "JWT_EXPIRATION_MINUTES")?;

        let admin_username = ConfigSpec::new(env_provider.clone())
            .env_override("ADMIN_USERNAME")
            .default_value("admin")
            .min_length(3)
            .max_length(64)
            .load_setting()?
            .value;

        let admin_email = ConfigSpec::new(env_provider.clone())
            .env_override("ADMIN_EMAIL")
            .default_value("admin@coursehub.local")
            .validator(ConfigSpec::validate_email)
            .load_setting()?
            .value;

        // Absent means "generate one at bootstrap"
        let admin_password = ConfigSpec::new(env_provider.clone())
            .env_override("ADMIN_PASSWORD")
            .min_length(8)
            .load_setting()?;
        let admin_password = admin_password.is_set().then_some(admin_password.value);

        let seed_value = ConfigSpec::new(env_provider)
            .env_override("SEED_DEMO_COURSES")
            .default_value("true")
            .load_setting()?
            .value;
        let seed_demo_courses = ConfigSpec::parse_bool(&seed_value, "SEED_DEMO_COURSES")?;

        Ok(Self {
            jwt_expiration,
            admin_username,
            admin_email,
            admin_password,
            seed_demo_courses,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn jwt_expiration(&self) -> Duration {
        self.jwt_expiration
    }

    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }

    pub fn seed_demo_courses(&self) -> bool {
        self.seed_demo_courses
    }
}

impl fmt::Debug for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSettings")
            .field("jwt_expiration", &self.jwt_expiration)
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("seed_demo_courses", &self.seed_demo_courses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults() {
        let settings = ApplicationSettings::from_env_provider(Arc::new(MockEnvironment::empty())).unwrap();

        assert_eq!(settings.jwt_expiration(), Duration::from_secs(15 * 60));
        assert_eq!(settings.admin_username(), "admin");
        assert_eq!(settings.admin_email(), "admin@coursehub.local");
        assert_eq!(settings.admin_password(), None);
        assert!(settings.seed_demo_courses());
    }

    #[test]
    fn test_overrides() {
        let env = MockEnvironment::empty().with_vars(&[
            ("JWT_EXPIRATION_MINUTES", "60"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "supersecret"),
            ("SEED_DEMO_COURSES", "false"),
        ]);
        let settings = ApplicationSettings::from_env_provider(Arc::new(env)).unwrap();

        assert_eq!(settings.jwt_expiration(), Duration::from_secs(3600));
        assert_eq!(settings.admin_username(), "root");
        assert_eq!(settings.admin_password(), Some("supersecret"));
        assert!(!settings.seed_demo_courses());
    }

    #[test]
    fn test_invalid_admin_email_rejected() {
        let env = MockEnvironment::empty().with_var("ADMIN_EMAIL", "not-an-email");
        assert!(ApplicationSettings::from_env_provider(Arc::new(env)).is_err());
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let env = MockEnvironment::empty().with_var("ADMIN_PASSWORD", "supersecret");
        let settings = ApplicationSettings::from_env_provider(Arc::new(env)).unwrap();

        let debug_str = format!("{:?}", settings);
        assert!(debug_str.contains("<redacted>"));
        assert!(!debug_str.contains("supersecret"));
    }
}
