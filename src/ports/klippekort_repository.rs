//! UserKlippekort repository port.

use crate::domain::foundation::{DomainError, UserId, UserKlippekortId};
use crate::domain::klippekort::UserKlippekort;
use async_trait::async_trait;

/// Repository port for punch-card persistence.
///
/// Same compare-and-swap contract as
/// [`UserMembershipRepository`](super::UserMembershipRepository).
#[async_trait]
pub trait UserKlippekortRepository: Send + Sync {
    async fn load(&self, id: &UserKlippekortId) -> Result<Option<UserKlippekort>, DomainError>;

    /// All cards owned by the user, newest purchase first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserKlippekort>, DomainError>;

    async fn insert(&self, klippekort: &UserKlippekort) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored version differs from `expected_version`
    async fn save(&self, klippekort: &UserKlippekort, expected_version: i32)
        -> Result<(), DomainError>;
}
