//! Load-validate-save loop shared by subscription mutations.

use std::future::Future;
use std::sync::Arc;

use crate::application::StoragePolicy;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::membership::{MembershipError, UserMembership};
use crate::ports::UserMembershipRepository;

/// Applies a mutation to the user's current subscription with
/// compare-and-swap semantics.
///
/// The mutation receives a fresh copy on every attempt. When the save loses
/// the race the subscription is reloaded and the mutation re-validated
/// against the new state, up to `max_change_attempts` times.
#[derive(Clone)]
pub(crate) struct MembershipUpdater {
    repository: Arc<dyn UserMembershipRepository>,
    storage: StoragePolicy,
}

impl MembershipUpdater {
    pub(crate) fn new(repository: Arc<dyn UserMembershipRepository>, storage: StoragePolicy) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub(crate) async fn load_current(
        &self,
        user_id: &UserId,
    ) -> Result<UserMembership, MembershipError> {
        let repository = &self.repository;
        self.storage
            .call("load_current_membership", || repository.load_current(user_id))
            .await?
            .ok_or_else(|| MembershipError::not_found_for_user(user_id.clone()))
    }

    /// Runs `apply` and persists the result.
    ///
    /// A mutation that leaves the subscription unchanged is not saved.
    pub(crate) async fn update<T, F, Fut>(
        &self,
        user_id: &UserId,
        mut apply: F,
    ) -> Result<(UserMembership, T), MembershipError>
    where
        F: FnMut(UserMembership) -> Fut,
        Fut: Future<Output = Result<(UserMembership, T), MembershipError>>,
    {
        let repository = &self.repository;

        for attempt in 1..=self.storage.max_change_attempts {
            let current = self.load_current(user_id).await?;
            let expected = current.version;

            let (mut updated, value) = apply(current.clone()).await?;
            if updated == current {
                return Ok((updated, value));
            }

            updated.version = expected + 1;
            match self
                .storage
                .write("save_membership", || repository.save(&updated, expected))
                .await
            {
                Ok(()) => return Ok((updated, value)),
                Err(e) if e.code == ErrorCode::ConcurrentModification => {
                    tracing::debug!(user_id = %user_id, attempt, "membership changed concurrently, reloading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            user_id = %user_id,
            attempts = self.storage.max_change_attempts,
            "giving up on contended membership update"
        );
        Err(MembershipError::conflict(format!(
            "gave up after {} attempts",
            self.storage.max_change_attempts
        )))
    }
}
