//! Typed service configuration.
//!
//! Values come from the process environment (and a `.env` file when one is
//! present) under the `STUDIO` prefix, with `__` between path segments:
//!
//! | Variable                             | Field                        |
//! |--------------------------------------|------------------------------|
//! | `STUDIO__DATABASE__URL`              | `database.url` (required)    |
//! | `STUDIO__SERVER__PORT`               | `server.port`                |
//! | `STUDIO__SERVER__ENVIRONMENT`        | `server.environment`         |
//! | `STUDIO__STUDIO__TIMEZONE`           | `studio.timezone`            |
//! | `STUDIO__STUDIO__MAX_CHANGE_ATTEMPTS`| `studio.max_change_attempts` |
//!
//! ```no_run
//! use studio_membership::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod server;
mod studio;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use studio::StudioConfig;

use serde::Deserialize;

/// Everything the binary needs to start.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub studio: StudioConfig,
}

impl AppConfig {
    /// Reads the environment. Fails when `database.url` is missing or a value
    /// does not parse; range checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Environment::with_prefix("STUDIO")
            .prefix_separator("__")
            .separator("__");

        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.studio.validate()
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

    // Env vars are process-global.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "STUDIO__DATABASE__URL",
        "STUDIO__SERVER__PORT",
        "STUDIO__SERVER__ENVIRONMENT",
        "STUDIO__STUDIO__TIMEZONE",
        "STUDIO__STUDIO__MAX_CHANGE_ATTEMPTS",
    ];

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        for key in VARS {
            env::remove_var(key);
        }
        result
    }

    const DB: (&str, &str) = ("STUDIO__DATABASE__URL", "postgresql://test@localhost/studio");

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = load_with(&[DB]).unwrap();

        assert_eq!(
            config.database.url.expose_secret(),
            "postgresql://test@localhost/studio"
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.studio.timezone, "Europe/Oslo");
        assert_eq!(config.studio.max_change_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_apply() {
        let config = load_with(&[
            DB,
            ("STUDIO__SERVER__ENVIRONMENT", "production"),
            ("STUDIO__STUDIO__TIMEZONE", "America/New_York"),
            ("STUDIO__STUDIO__MAX_CHANGE_ATTEMPTS", "5"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.studio.tz().unwrap(), chrono_tz::America::New_York);
        assert_eq!(config.studio.max_change_attempts, 5);
    }

    #[test]
    fn bad_timezone_loads_but_fails_validation() {
        let config = load_with(&[DB, ("STUDIO__STUDIO__TIMEZONE", "Nowhere/Atlantis")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn missing_database_url_fails() {
        assert!(load_with(&[]).is_err());
    }
}
