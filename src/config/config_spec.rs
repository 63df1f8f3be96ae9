use std::sync::Arc;
use std::time::Duration;

use crate::config::EnvironmentProvider;
use crate::config::errors::ApplicationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
    Unset,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

impl ConfigValue {
    pub fn is_set(&self) -> bool {
        self.source != ConfigValueSource::Unset
    }
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            max_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load a setting value with source tracking
    ///
    /// Environment variable first, then the default. A required setting with
    /// neither is an error; an optional one comes back as `Unset`.
    pub fn load_setting(&self) -> Result<ConfigValue, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;

                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                });
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;

            return Ok(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            });
        }

        if self.required {
            return Err(ApplicationError::invalid_setting(
                self.setting_name(),
                "Required setting has no value from any source",
            ));
        }

        Ok(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Unset,
        })
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ApplicationError::invalid_setting(
                    setting_name,
                    format!("Value must be at least {} characters long", min_len),
                ));
            }
        }

        if let Some(max_len) = self.max_length {
            if value.len() > max_len {
                return Err(ApplicationError::invalid_setting(
                    setting_name,
                    format!("Value must be at most {} characters long", max_len),
                ));
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::invalid_setting(setting_name, reason))?;
        }

        Ok(())
    }
}

/// Type parsing utilities for configuration values
impl ConfigSpec {
    /// Parse a duration value in minutes from string
    pub fn parse_duration_minutes(value: &str, setting_name: &str) -> Result<Duration, ApplicationError> {
        let minutes = value.trim().parse::<u64>().map_err(|e| {
            ApplicationError::parse_error(
                setting_name,
                format!("Expected positive integer for minutes, got '{}': {}", value, e),
            )
        })?;

        if minutes == 0 {
            return Err(ApplicationError::invalid_setting(setting_name, "Duration must be at least 1 minute"));
        }

        Ok(Duration::from_secs(minutes * 60))
    }

    /// Parse a boolean value from string
    ///
    /// Accepts true/false, 1/0, yes/no, on/off, enabled/disabled (case insensitive).
    pub fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ApplicationError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
            "false" | "0" | "no" | "off" | "disabled" => Ok(false),
            _ => Err(ApplicationError::parse_error(
                setting_name,
                format!(
                    "Expected boolean value, got '{}'. Valid values: true/false, 1/0, yes/no, on/off, enabled/disabled",
                    value
                ),
            )),
        }
    }

    /// Parse a port number from string with validation
    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        let port = value.trim().parse::<u16>().map_err(|e| {
            ApplicationError::parse_error(
                setting_name,
                format!("Expected port number (1-65535), got '{}': {}", value, e),
            )
        })?;

        if port == 0 {
            return Err(ApplicationError::invalid_setting(
                setting_name,
                "Port number must be between 1 and 65535",
            ));
        }

        Ok(port)
    }

    /// Validator: host must be non-empty and free of whitespace
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        let host = value.trim();
        if host.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }
        if host.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }
        // Dotted-quad hosts must be real IPv4 addresses
        if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(format!("Invalid IPv4 address '{}'", host));
        }
        Ok(())
    }

    /// Validator: port parses and is in 1..=65535
    pub fn validate_port(value: &str) -> Result<(), String> {
        match value.trim().parse::<u16>() {
            Ok(0) => Err("Port 0 is outside valid range 1-65535".to_string()),
            Ok(_) => Ok(()),
            Err(_) => Err(format!("Expected port number between 1 and 65535, got '{}'", value)),
        }
    }

    /// Validator: value looks like an email address
    pub fn validate_email(value: &str) -> Result<(), String> {
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(format!("Expected an email address, got '{}'", value)),
        }
    }
}
