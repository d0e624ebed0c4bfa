//! Klippekort-specific error types.

use crate::domain::foundation::{
    DomainError, ErrorCode, KlippekortPackageId, Timestamp, UserKlippekortId, ValidationError,
};

/// Klippekort-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KlippekortError {
    /// Card does not exist or belongs to someone else.
    NotFound(UserKlippekortId),

    PackageNotFound(KlippekortPackageId),

    /// Package exists but is no longer sold.
    PackageUnavailable(KlippekortPackageId),

    /// Card has been deactivated by staff.
    Inactive(UserKlippekortId),

    InsufficientBalance { remaining: u32, requested: u32 },

    Expired { expired_at: Timestamp },

    /// The card kept changing underneath us.
    Conflict(String),

    Unauthorized,

    Forbidden,

    ValidationFailed { field: String, message: String },

    StorageUnavailable(String),

    Timeout(String),

    Infrastructure(String),
}

impl KlippekortError {
    pub fn not_found(id: UserKlippekortId) -> Self {
        KlippekortError::NotFound(id)
    }

    pub fn insufficient_balance(remaining: u32, requested: u32) -> Self {
        KlippekortError::InsufficientBalance {
            remaining,
            requested,
        }
    }

    pub fn expired(expired_at: Timestamp) -> Self {
        KlippekortError::Expired { expired_at }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        KlippekortError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            KlippekortError::NotFound(_) => ErrorCode::KlippekortNotFound,
            KlippekortError::PackageNotFound(_) => ErrorCode::KlippekortPackageNotFound,
            KlippekortError::PackageUnavailable(_) | KlippekortError::Inactive(_) => {
                ErrorCode::InvalidStateTransition
            }
            KlippekortError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            KlippekortError::Expired { .. } => ErrorCode::KlippekortExpired,
            KlippekortError::Conflict(_) => ErrorCode::ConcurrentModification,
            KlippekortError::Unauthorized => ErrorCode::Unauthorized,
            KlippekortError::Forbidden => ErrorCode::Forbidden,
            KlippekortError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            KlippekortError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            KlippekortError::Timeout(_) => ErrorCode::Timeout,
            KlippekortError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            KlippekortError::NotFound(id) => format!("Klippekort not found: {}", id),
            KlippekortError::PackageNotFound(id) => format!("Klippekort package not found: {}", id),
            KlippekortError::PackageUnavailable(id) => {
                format!("Klippekort package {} is no longer sold", id)
            }
            KlippekortError::Inactive(id) => format!("Klippekort {} is deactivated", id),
            KlippekortError::InsufficientBalance {
                remaining,
                requested,
            } => format!(
                "Not enough klipp left: {} remaining, {} requested",
                remaining, requested
            ),
            KlippekortError::Expired { expired_at } => format!(
                "Klippekort expired on {}",
                expired_at.as_datetime().format("%Y-%m-%d")
            ),
            KlippekortError::Conflict(msg) => format!("Klippekort was changed concurrently: {}", msg),
            KlippekortError::Unauthorized => "Authentication required".to_string(),
            KlippekortError::Forbidden => "Administrator access required".to_string(),
            KlippekortError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            KlippekortError::StorageUnavailable(msg) => format!("Storage unavailable: {}", msg),
            KlippekortError::Timeout(msg) => format!("Storage timed out: {}", msg),
            KlippekortError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            KlippekortError::StorageUnavailable(_)
                | KlippekortError::Timeout(_)
                | KlippekortError::Conflict(_)
        )
    }
}

impl std::fmt::Display for KlippekortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for KlippekortError {}

impl From<DomainError> for KlippekortError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrentModification => KlippekortError::Conflict(err.message),
            ErrorCode::ValidationFailed => KlippekortError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Unauthorized => KlippekortError::Unauthorized,
            ErrorCode::Forbidden => KlippekortError::Forbidden,
            ErrorCode::StorageUnavailable => KlippekortError::StorageUnavailable(err.message),
            ErrorCode::Timeout => KlippekortError::Timeout(err.message),
            _ => KlippekortError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for KlippekortError {
    fn from(err: ValidationError) -> Self {
        KlippekortError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<KlippekortError> for DomainError {
    fn from(err: KlippekortError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_message_includes_counts() {
        let err = KlippekortError::insufficient_balance(0, 1);
        assert_eq!(err.to_string(), "Not enough klipp left: 0 remaining, 1 requested");
        assert_eq!(err.code(), ErrorCode::InsufficientBalance);
    }

    #[test]
    fn expired_maps_to_expired_code() {
        assert_eq!(
            KlippekortError::expired(Timestamp::now()).code(),
            ErrorCode::KlippekortExpired
        );
    }

    #[test]
    fn from_domain_error_maps_storage_codes() {
        let err: KlippekortError = DomainError::new(ErrorCode::Timeout, "slow").into();
        assert!(matches!(err, KlippekortError::Timeout(_)));
        assert!(err.is_retryable());

        let err: KlippekortError = DomainError::concurrent_modification("UserKlippekort").into();
        assert!(matches!(err, KlippekortError::Conflict(_)));
    }

    #[test]
    fn business_rejections_are_not_retryable() {
        assert!(!KlippekortError::insufficient_balance(1, 2).is_retryable());
        assert!(!KlippekortError::Forbidden.is_retryable());
    }
}
