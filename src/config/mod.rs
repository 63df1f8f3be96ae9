mod application_settings;
mod bootstrap_settings;
mod config_spec;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_manager;

pub use application_settings::ApplicationSettings;
pub use bootstrap_settings::BootstrapSettings;
pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use database::{connect_database, migrate_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::{ApplicationError, SecretError};
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use secret_manager::SecretManager;
