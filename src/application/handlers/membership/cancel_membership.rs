//! CancelMembershipHandler - Command handler for ending subscriptions.
//!
//! Members cancel through `CancelMembershipHandler`, which honours the
//! binding period. Staff terminate through `RemoveMembershipHandler`, which
//! does not.

use std::sync::Arc;

use crate::application::authorization::require_admin;
use crate::application::StoragePolicy;
use crate::domain::foundation::UserId;
use crate::domain::membership::{MembershipError, UserMembership};
use crate::ports::{AdminAuthorizer, Clock, UserMembershipRepository};

use super::updater::MembershipUpdater;

/// Command to cancel the caller's own subscription.
#[derive(Debug, Clone)]
pub struct CancelMembershipCommand {
    pub user_id: UserId,
}

/// Result of a successful cancellation or termination.
#[derive(Debug, Clone)]
pub struct CancelMembershipResult {
    pub membership: UserMembership,
}

/// Handler for member-initiated cancellation.
pub struct CancelMembershipHandler {
    updater: MembershipUpdater,
    clock: Arc<dyn Clock>,
}

impl CancelMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            updater: MembershipUpdater::new(memberships, storage),
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelMembershipCommand,
    ) -> Result<CancelMembershipResult, MembershipError> {
        let clock = &self.clock;
        let (membership, ()) = self
            .updater
            .update(&cmd.user_id, move |mut current| async move {
                current.cancel(&clock.now())?;
                Ok((current, ()))
            })
            .await
            .map_err(|e| {
                tracing::debug!(user_id = %cmd.user_id, error = %e, "cancellation rejected");
                e
            })?;

        tracing::info!(user_id = %cmd.user_id, "membership cancelled");
        Ok(CancelMembershipResult { membership })
    }
}

/// Command for staff to end a user's subscription immediately.
#[derive(Debug, Clone)]
pub struct RemoveMembershipCommand {
    pub actor: UserId,
    pub user_id: UserId,
}

/// Handler for administrative termination.
pub struct RemoveMembershipHandler {
    updater: MembershipUpdater,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl RemoveMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        authorizer: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            updater: MembershipUpdater::new(memberships, storage),
            authorizer,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveMembershipCommand,
    ) -> Result<CancelMembershipResult, MembershipError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        let clock = &self.clock;
        let (membership, ()) = self
            .updater
            .update(&cmd.user_id, move |mut current| async move {
                current.terminate(&clock.now())?;
                Ok((current, ()))
            })
            .await?;

        tracing::info!(user_id = %cmd.user_id, actor = %cmd.actor, "membership terminated");
        Ok(CancelMembershipResult { membership })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture, ADMIN};
    use crate::domain::foundation::Timestamp;
    use crate::domain::membership::MembershipStatus;
    use crate::ports::{Clock, UserMembershipRepository as _};
    use chrono::Duration;

    fn cancel_handler(f: &Fixture) -> CancelMembershipHandler {
        CancelMembershipHandler::new(f.memberships.clone(), f.clock.clone(), f.storage)
    }

    fn remove_handler(f: &Fixture) -> RemoveMembershipHandler {
        RemoveMembershipHandler::new(
            f.memberships.clone(),
            f.auth.clone(),
            f.clock.clone(),
            f.storage,
        )
    }

    #[tokio::test]
    async fn cancel_without_binding_succeeds() {
        let f = Fixture::new();
        let plan = f.plan("Flex", 59900, 0).await;
        f.subscribe("m1", &plan).await;

        let result = cancel_handler(&f)
            .handle(CancelMembershipCommand { user_id: user("m1") })
            .await
            .unwrap();

        assert_eq!(result.membership.status, MembershipStatus::Cancelled);
        assert_eq!(
            result.membership.end_date,
            Some(Timestamp::from_datetime(f.clock.now()))
        );
        assert!(f.current("m1").await.is_none());
    }

    #[tokio::test]
    async fn cancel_blocked_until_binding_passes() {
        let f = Fixture::new();
        let plan = f.plan("Flex", 59900, 0).await;
        let mut m = f.subscribe("m1", &plan).await;

        // Binding ends 30 days from now.
        let binding_end = Timestamp::from_datetime(f.clock.now() + Duration::days(30));
        m.binding_end = Some(binding_end);
        m.version = 1;
        f.memberships.save(&m, 0).await.unwrap();

        let h = cancel_handler(&f);
        let err = h
            .handle(CancelMembershipCommand { user_id: user("m1") })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::binding_period_active(binding_end));

        f.clock.advance(Duration::days(31));
        h.handle(CancelMembershipCommand { user_id: user("m1") })
            .await
            .unwrap();
        assert!(f.current("m1").await.is_none());
    }

    #[tokio::test]
    async fn cancel_without_subscription_is_not_found() {
        let f = Fixture::new();
        let err = cancel_handler(&f)
            .handle(CancelMembershipCommand { user_id: user("ghost") })
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::NotFoundForUser(_)));
    }

    #[tokio::test]
    async fn admin_removal_ignores_binding() {
        let f = Fixture::new();
        let plan = f.plan("Bound", 39900, 12).await;
        f.subscribe("m1", &plan).await;

        let result = remove_handler(&f)
            .handle(RemoveMembershipCommand {
                actor: user(ADMIN),
                user_id: user("m1"),
            })
            .await
            .unwrap();

        assert_eq!(result.membership.status, MembershipStatus::Cancelled);
        assert!(f.current("m1").await.is_none());
    }

    #[tokio::test]
    async fn removal_requires_admin() {
        let f = Fixture::new();
        let plan = f.plan("Bound", 39900, 12).await;
        f.subscribe("m1", &plan).await;

        let err = remove_handler(&f)
            .handle(RemoveMembershipCommand {
                actor: user("m1"),
                user_id: user("m1"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, MembershipError::Forbidden);
        assert!(f.current("m1").await.is_some());
    }
}
