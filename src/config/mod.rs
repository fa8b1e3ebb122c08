//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `TACTICSPHERE` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use tacticsphere::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod server;
mod survey;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use survey::SurveyConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Bearer token verification
    pub auth: AuthConfig,

    /// Auto-assignment window
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` when present, then reads `TACTICSPHERE__*` variables:
    ///
    /// - `TACTICSPHERE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TACTICSPHERE__DATABASE__URL=...` -> `database.url = ...`
    /// - `TACTICSPHERE__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TACTICSPHERE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.survey.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("TACTICSPHERE__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("TACTICSPHERE__AUTH__JWT_SECRET", "test-secret");
    }

    fn clear_env() {
        env::remove_var("TACTICSPHERE__DATABASE__URL");
        env::remove_var("TACTICSPHERE__AUTH__JWT_SECRET");
        env::remove_var("TACTICSPHERE__SERVER__PORT");
        env::remove_var("TACTICSPHERE__SERVER__ENVIRONMENT");
        env::remove_var("TACTICSPHERE__SURVEY__AUTO_ASSIGNMENT_HORIZON_DAYS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.jwt_secret.expose_secret(), "test-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.survey.auto_assignment_horizon_days, 3650);
        assert_eq!(config.auth.leeway_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TACTICSPHERE__SERVER__PORT", "3000");
        env::set_var("TACTICSPHERE__SURVEY__AUTO_ASSIGNMENT_HORIZON_DAYS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.survey.auto_assignment_horizon_days, 30);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TACTICSPHERE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(matches!(config.validate(), Err(ValidationError::JwtSecretTooShort)));
    }
}
