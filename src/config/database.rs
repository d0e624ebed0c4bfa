//! PostgreSQL pool settings.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 50;

/// Connection pool for the membership schema.
///
/// `url` is the only required value. It is kept behind [`SecretString`] so
/// credentials never reach `Debug` output or logs.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    #[serde(default = "PoolLimits::min")]
    pub min_connections: u32,
    #[serde(default = "PoolLimits::max")]
    pub max_connections: u32,
    #[serde(default = "PoolLimits::acquire_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "PoolLimits::idle_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "PoolLimits::lifetime_secs")]
    pub max_lifetime_secs: u64,
    /// Apply `migrations/` before serving.
    #[serde(default)]
    pub run_migrations: bool,
}

struct PoolLimits;

impl PoolLimits {
    fn min() -> u32 {
        1
    }
    fn max() -> u32 {
        10
    }
    fn acquire_secs() -> u64 {
        5
    }
    fn idle_secs() -> u64 {
        300
    }
    fn lifetime_secs() -> u64 {
        1800
    }
}

impl DatabaseConfig {
    /// Pool settings with defaults for everything but the URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::new(url.into()),
            min_connections: PoolLimits::min(),
            max_connections: PoolLimits::max(),
            acquire_timeout_secs: PoolLimits::acquire_secs(),
            idle_timeout_secs: PoolLimits::idle_secs(),
            max_lifetime_secs: PoolLimits::lifetime_secs(),
            run_migrations: false,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.url.expose_secret();
        if url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("database.url"));
        }
        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge(MAX_POOL_SIZE));
        }
        Ok(())
    }
}
