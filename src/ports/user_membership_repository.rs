//! UserMembership repository port.
//!
//! Defines the contract for persisting subscriptions. Every write after
//! creation is a compare-and-swap on `version`, which is what serializes
//! concurrent transitions for the same user.
//!
//! # Example
//!
//! ```ignore
//! let mut current = repo.load_current(&user_id).await?.ok_or(...)?;
//! let expected = current.version;
//! current.request_freeze(&now)?;
//! current.version = expected + 1;
//! repo.save(&current, expected).await?; // ConcurrentModification if raced
//! ```

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::membership::UserMembership;
use async_trait::async_trait;

/// Repository port for UserMembership persistence.
///
/// Implementations must ensure:
/// - At most one non-cancelled subscription per user
/// - `save` only succeeds when the stored version equals `expected_version`
#[async_trait]
pub trait UserMembershipRepository: Send + Sync {
    /// The user's non-cancelled subscription, if any.
    async fn load_current(&self, user_id: &UserId) -> Result<Option<UserMembership>, DomainError>;

    /// Stores a new subscription.
    ///
    /// # Errors
    ///
    /// - `MembershipExists` if the user already has a non-cancelled subscription
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, membership: &UserMembership) -> Result<(), DomainError>;

    /// Replaces a stored subscription if nobody changed it in between.
    ///
    /// The stored row takes the version carried by `membership`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored version differs from `expected_version`
    /// - `DatabaseError` on persistence failure
    async fn save(&self, membership: &UserMembership, expected_version: i32)
        -> Result<(), DomainError>;
}
