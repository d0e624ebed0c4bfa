use thiserror::Error;

/// Failure to read configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A configuration value outside its allowed range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required setting {0}")]
    MissingRequired(&'static str),

    #[error("port must be non-zero")]
    InvalidPort,

    #[error("host and port do not form a socket address")]
    InvalidHost,

    #[error("request timeout out of range")]
    InvalidTimeout,

    #[error("database url must use the postgres scheme")]
    InvalidDatabaseUrl,

    #[error("pool needs max_connections > 0 and min_connections <= max_connections")]
    InvalidPoolSize,

    #[error("pool size may not exceed {0}")]
    PoolSizeTooLarge(u32),

    #[error("unknown timezone {0}")]
    UnknownTimezone(String),

    #[error("storage timeout must be between 1 and 60000 ms")]
    InvalidStorageTimeout,

    #[error("max_change_attempts must be at least 1")]
    InvalidChangeAttempts,

    #[error("expiry_warning_days must not be negative")]
    InvalidExpiryWarning,
}
