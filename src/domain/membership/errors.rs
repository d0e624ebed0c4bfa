//! Membership-specific error types.
//!
//! Errors raised by subscription lifecycle operations, plan catalog
//! administration and rule configuration.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | PlanNotFound, NotFoundForUser, NotFound | 404 |
//! | Unauthorized | 401 |
//! | Forbidden | 403 |
//! | AlreadyExists, Conflict | 409 |
//! | InvalidTransition, BindingPeriodActive | 409 |
//! | ValidationFailed | 400 |
//! | Timeout | 504 |
//! | StorageUnavailable | 503 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, Timestamp, UserId, ValidationError,
};

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Membership plan was not found in the catalog.
    PlanNotFound(MembershipId),

    /// User has no current (non-cancelled) subscription.
    NotFoundForUser(UserId),

    /// Some other entity was not found.
    NotFound(String),

    /// User already has a non-cancelled subscription.
    AlreadyExists(UserId),

    /// The subscription kept changing underneath us.
    Conflict(String),

    /// Transition rejected by the state machine or the membership rules.
    InvalidTransition { reason: String },

    /// Cancellation blocked until the binding period has elapsed.
    BindingPeriodActive { binding_end: Timestamp },

    /// No valid session.
    Unauthorized,

    /// Caller lacks administrator capability.
    Forbidden,

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Storage failed twice in a row.
    StorageUnavailable(String),

    /// Storage call exceeded its deadline.
    Timeout(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl MembershipError {
    pub fn plan_not_found(id: MembershipId) -> Self {
        MembershipError::PlanNotFound(id)
    }

    pub fn not_found_for_user(user_id: UserId) -> Self {
        MembershipError::NotFoundForUser(user_id)
    }

    pub fn already_exists(user_id: UserId) -> Self {
        MembershipError::AlreadyExists(user_id)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        MembershipError::Conflict(message.into())
    }

    pub fn invalid_transition(reason: impl Into<String>) -> Self {
        MembershipError::InvalidTransition {
            reason: reason.into(),
        }
    }

    pub fn binding_period_active(binding_end: Timestamp) -> Self {
        MembershipError::BindingPeriodActive { binding_end }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::PlanNotFound(_) => ErrorCode::MembershipPlanNotFound,
            MembershipError::NotFoundForUser(_) => ErrorCode::MembershipNotFound,
            MembershipError::NotFound(_) => ErrorCode::NotFound,
            MembershipError::AlreadyExists(_) => ErrorCode::MembershipExists,
            MembershipError::Conflict(_) => ErrorCode::ConcurrentModification,
            MembershipError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::BindingPeriodActive { .. } => ErrorCode::BindingPeriodActive,
            MembershipError::Unauthorized => ErrorCode::Unauthorized,
            MembershipError::Forbidden => ErrorCode::Forbidden,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            MembershipError::Timeout(_) => ErrorCode::Timeout,
            MembershipError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::PlanNotFound(id) => format!("Membership plan not found: {}", id),
            MembershipError::NotFoundForUser(user_id) => {
                format!("No current membership for user: {}", user_id)
            }
            MembershipError::NotFound(what) => format!("Not found: {}", what),
            MembershipError::AlreadyExists(user_id) => {
                format!("User {} already has a membership", user_id)
            }
            MembershipError::Conflict(msg) => format!("Membership was changed concurrently: {}", msg),
            MembershipError::InvalidTransition { reason } => {
                format!("Membership change not allowed: {}", reason)
            }
            MembershipError::BindingPeriodActive { binding_end } => format!(
                "Membership is bound until {}",
                binding_end.as_datetime().format("%Y-%m-%d")
            ),
            MembershipError::Unauthorized => "Authentication required".to_string(),
            MembershipError::Forbidden => "Administrator access required".to_string(),
            MembershipError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::StorageUnavailable(msg) => format!("Storage unavailable: {}", msg),
            MembershipError::Timeout(msg) => format!("Storage timed out: {}", msg),
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the caller may retry the whole request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MembershipError::StorageUnavailable(_)
                | MembershipError::Timeout(_)
                | MembershipError::Conflict(_)
        )
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound
            | ErrorCode::MembershipNotFound
            | ErrorCode::MembershipPlanNotFound => MembershipError::NotFound(err.message),
            ErrorCode::MembershipExists | ErrorCode::ConcurrentModification => {
                MembershipError::Conflict(err.message)
            }
            ErrorCode::InvalidStateTransition => MembershipError::InvalidTransition {
                reason: err.message,
            },
            ErrorCode::ValidationFailed => MembershipError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Unauthorized => MembershipError::Unauthorized,
            ErrorCode::Forbidden => MembershipError::Forbidden,
            ErrorCode::StorageUnavailable => MembershipError::StorageUnavailable(err.message),
            ErrorCode::Timeout => MembershipError::Timeout(err.message),
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        MembershipError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user_id() -> UserId {
        UserId::new("user-test-123").unwrap()
    }

    #[test]
    fn codes_follow_taxonomy() {
        assert_eq!(
            MembershipError::already_exists(test_user_id()).code(),
            ErrorCode::MembershipExists
        );
        assert_eq!(
            MembershipError::invalid_transition("nope").code(),
            ErrorCode::InvalidStateTransition
        );
        assert_eq!(
            MembershipError::binding_period_active(Timestamp::now()).code(),
            ErrorCode::BindingPeriodActive
        );
        assert_eq!(MembershipError::Forbidden.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn binding_message_shows_date() {
        let end = Timestamp::from_datetime(
            chrono::DateTime::parse_from_rfc3339("2025-03-01T00:00:00Z").unwrap(),
        );
        let err = MembershipError::binding_period_active(end);
        assert_eq!(err.to_string(), "Membership is bound until 2025-03-01");
    }

    #[test]
    fn from_domain_error_keeps_storage_semantics() {
        let timeout: MembershipError = DomainError::new(ErrorCode::Timeout, "load").into();
        assert!(matches!(timeout, MembershipError::Timeout(_)));

        let unavailable: MembershipError =
            DomainError::new(ErrorCode::StorageUnavailable, "down").into();
        assert!(matches!(unavailable, MembershipError::StorageUnavailable(_)));

        let cas: MembershipError = DomainError::concurrent_modification("UserMembership").into();
        assert!(matches!(cas, MembershipError::Conflict(_)));
    }

    #[test]
    fn from_domain_validation_keeps_field() {
        let err: MembershipError = DomainError::validation("price", "negative").into();
        match err {
            MembershipError::ValidationFailed { field, .. } => assert_eq!(field, "price"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unexpected_codes_become_infrastructure() {
        let err: MembershipError = DomainError::database("connection reset").into();
        assert!(matches!(err, MembershipError::Infrastructure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn round_trips_code_into_domain_error() {
        let domain: DomainError = MembershipError::Unauthorized.into();
        assert_eq!(domain.code, ErrorCode::Unauthorized);
    }
}
