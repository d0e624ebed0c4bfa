//! Studio business configuration

use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{StoragePolicy, DEFAULT_MAX_CHANGE_ATTEMPTS};
use crate::domain::billing::DEFAULT_EXPIRY_THRESHOLD_DAYS;

/// Studio-wide settings that shape the lifecycle rules
#[derive(Debug, Clone, Deserialize)]
pub struct StudioConfig {
    /// IANA timezone used for all calendar arithmetic
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Deadline for a single storage call, in milliseconds
    #[serde(default = "default_storage_timeout")]
    pub storage_timeout_ms: u64,

    /// Days ahead at which binding ends and card expiries are flagged
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Compare-and-swap attempts before a contended update gives up
    #[serde(default = "default_max_change_attempts")]
    pub max_change_attempts: u32,
}

impl StudioConfig {
    /// Parsed timezone.
    pub fn tz(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse()
            .map_err(|_| ValidationError::UnknownTimezone(self.timezone.clone()))
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    pub fn storage_policy(&self) -> StoragePolicy {
        StoragePolicy::new(self.storage_timeout(), self.max_change_attempts)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tz()?;
        if self.storage_timeout_ms == 0 || self.storage_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidStorageTimeout);
        }
        if self.max_change_attempts == 0 {
            return Err(ValidationError::InvalidChangeAttempts);
        }
        if self.expiry_warning_days < 0 {
            return Err(ValidationError::InvalidExpiryWarning);
        }
        Ok(())
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            storage_timeout_ms: default_storage_timeout(),
            expiry_warning_days: default_expiry_warning_days(),
            max_change_attempts: default_max_change_attempts(),
        }
    }
}

fn default_timezone() -> String {
    "Europe/Oslo".to_string()
}

fn default_storage_timeout() -> u64 {
    5000
}

fn default_expiry_warning_days() -> i64 {
    DEFAULT_EXPIRY_THRESHOLD_DAYS
}

fn default_max_change_attempts() -> u32 {
    DEFAULT_MAX_CHANGE_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StudioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Oslo);
        assert_eq!(config.storage_policy(), StoragePolicy::default());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = StudioConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = StudioConfig {
            max_change_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidChangeAttempts));
    }

    #[test]
    fn storage_timeout_bounds() {
        for ms in [0, 60_001] {
            let config = StudioConfig {
                storage_timeout_ms: ms,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidStorageTimeout));
        }
    }
}
