#[cfg(test)]
use std::collections::HashMap;

/// Trait for providing environment variable access
///
/// Lets configuration be loaded from an injected source so tests do not race
/// on the process-global environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_missing_var() {
        let provider = SystemEnvironment;
        assert_eq!(provider.get_var("COURSEHUB_NON_EXISTENT_VAR_98765"), None);
    }

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("PORT", "8080")
            .with_vars(&[("HOST", "127.0.0.1"), ("LOG_LEVEL", "debug")]);

        assert_eq!(provider.get_var("PORT"), Some("8080".to_string()));
        assert_eq!(provider.get_var("HOST"), Some("127.0.0.1".to_string()));
        assert_eq!(provider.get_var("LOG_LEVEL"), Some("debug".to_string()));
        assert_eq!(provider.get_var("DATABASE_URL"), None);
    }
}
