//! ChangeMembershipHandler - Command handler for switching plans.

use std::sync::Arc;

use crate::application::{RuleConfiguration, StoragePolicy};
use crate::domain::foundation::{MembershipId, UserId};
use crate::domain::membership::{Membership, MembershipError, PlanChange, UserMembership};
use crate::ports::{Clock, MembershipCatalog, UserMembershipRepository};

use super::updater::MembershipUpdater;

/// Command to move a user's subscription to another plan.
#[derive(Debug, Clone)]
pub struct ChangeMembershipCommand {
    pub user_id: UserId,
    pub membership_id: MembershipId,
}

/// Result of a successful plan change.
#[derive(Debug, Clone)]
pub struct ChangeMembershipResult {
    pub membership: UserMembership,
    pub previous_membership_id: MembershipId,
    pub change: PlanChange,
}

/// Handler for plan changes.
///
/// The studio rules are read once per request. The subscription itself is
/// reloaded on every compare-and-swap attempt, so two concurrent changes for
/// the same user never interleave.
pub struct ChangeMembershipHandler {
    updater: MembershipUpdater,
    catalog: Arc<dyn MembershipCatalog>,
    rules: Arc<RuleConfiguration>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl ChangeMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        catalog: Arc<dyn MembershipCatalog>,
        rules: Arc<RuleConfiguration>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            updater: MembershipUpdater::new(memberships, storage),
            catalog,
            rules,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: ChangeMembershipCommand,
    ) -> Result<ChangeMembershipResult, MembershipError> {
        let target = self.find_plan(&cmd.membership_id).await?;
        let rules = self.rules.current().await?;

        let target = &target;
        let rules = &rules;
        let (membership, (previous_membership_id, change)) = self
            .updater
            .update(&cmd.user_id, move |mut current| async move {
                let previous = current.membership_id;
                let current_plan = self.find_plan(&previous).await?;
                let change = current
                    .change_membership(&current_plan, target, rules, &self.clock.now())
                    .map_err(|e| {
                        tracing::debug!(user_id = %current.user_id, error = %e, "plan change rejected");
                        e
                    })?;
                Ok((current, (previous, change)))
            })
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            from = %previous_membership_id,
            to = %membership.membership_id,
            ?change,
            "membership changed"
        );

        Ok(ChangeMembershipResult {
            membership,
            previous_membership_id,
            change,
        })
    }

    async fn find_plan(&self, id: &MembershipId) -> Result<Membership, MembershipError> {
        let catalog = &self.catalog;
        self.storage
            .call("find_plan", || catalog.find(id))
            .await?
            .ok_or(MembershipError::plan_not_found(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{start, user, Fixture};
    use crate::domain::billing;
    use crate::domain::foundation::DomainError;
    use crate::domain::membership::MembershipRules;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn handler(f: &Fixture) -> ChangeMembershipHandler {
        ChangeMembershipHandler::new(
            f.memberships.clone(),
            f.plans.clone(),
            f.rules.clone(),
            f.clock.clone(),
            f.storage,
        )
    }

    fn cmd(user_id: &str, plan: &Membership) -> ChangeMembershipCommand {
        ChangeMembershipCommand {
            user_id: user(user_id),
            membership_id: plan.id,
        }
    }

    #[tokio::test]
    async fn upgrade_switches_plan_and_bumps_version() {
        let f = Fixture::new();
        let basic = f.plan("Basis", 39900, 0).await;
        let premium = f.plan("Premium", 69900, 0).await;
        f.subscribe("m1", &basic).await;

        let result = handler(&f).handle(cmd("m1", &premium)).await.unwrap();

        assert_eq!(result.change, PlanChange::Upgrade);
        assert_eq!(result.previous_membership_id, basic.id);
        let stored = f.current("m1").await.unwrap();
        assert_eq!(stored.membership_id, premium.id);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn downgrade_rejected_by_default_rules() {
        let f = Fixture::new();
        let basic = f.plan("Basis", 39900, 0).await;
        let premium = f.plan("Premium", 69900, 0).await;
        f.subscribe("m1", &premium).await;

        let err = handler(&f).handle(cmd("m1", &basic)).await.unwrap_err();

        assert!(matches!(err, MembershipError::InvalidTransition { .. }));
        assert_eq!(f.current("m1").await.unwrap().membership_id, premium.id);
    }

    #[tokio::test]
    async fn rules_update_takes_effect_immediately() {
        let f = Fixture::new();
        let basic = f.plan("Basis", 39900, 0).await;
        let premium = f.plan("Premium", 69900, 0).await;
        f.subscribe("m1", &premium).await;
        let h = handler(&f);

        assert!(h.handle(cmd("m1", &basic)).await.is_err());

        f.rules
            .update(MembershipRules {
                allow_downgrades: true,
                ..MembershipRules::default()
            })
            .await
            .unwrap();

        let result = h.handle(cmd("m1", &basic)).await.unwrap();
        assert_eq!(result.change, PlanChange::Downgrade);
    }

    #[tokio::test]
    async fn combined_binding_keeps_later_end() {
        let f = Fixture::with_rules(MembershipRules {
            combine_binding_periods: true,
            allow_change_during_binding: true,
            ..MembershipRules::default()
        });
        let long = f.plan("Long", 39900, 12).await;
        let short = f.plan("Short", 49900, 3).await;
        let original = f.subscribe("m1", &long).await;

        f.clock.advance(Duration::days(10));
        handler(&f).handle(cmd("m1", &short)).await.unwrap();

        assert_eq!(f.current("m1").await.unwrap().binding_end, original.binding_end);
    }

    #[tokio::test]
    async fn fresh_binding_without_combine() {
        let f = Fixture::with_rules(MembershipRules {
            allow_change_during_binding: true,
            ..MembershipRules::default()
        });
        let long = f.plan("Long", 39900, 12).await;
        let short = f.plan("Short", 49900, 3).await;
        f.subscribe("m1", &long).await;

        handler(&f).handle(cmd("m1", &short)).await.unwrap();

        assert_eq!(
            f.current("m1").await.unwrap().binding_end,
            billing::binding_end_from(&start(), 3)
        );
    }

    #[tokio::test]
    async fn missing_subscription_is_not_found() {
        let f = Fixture::new();
        let premium = f.plan("Premium", 69900, 0).await;

        let err = handler(&f).handle(cmd("ghost", &premium)).await.unwrap_err();
        assert_eq!(err, MembershipError::not_found_for_user(user("ghost")));
    }

    #[tokio::test]
    async fn unknown_target_plan_is_not_found() {
        let f = Fixture::new();
        let basic = f.plan("Basis", 39900, 0).await;
        f.subscribe("m1", &basic).await;
        let missing = MembershipId::new();

        let err = handler(&f)
            .handle(ChangeMembershipCommand {
                user_id: user("m1"),
                membership_id: missing,
            })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::plan_not_found(missing));
    }

    /// Commits the first save, then reports the connection as lost.
    struct DropsReplyAfterCommit {
        inner: Arc<crate::adapters::storage::InMemoryUserMembershipRepository>,
        saves: AtomicU32,
    }

    #[async_trait]
    impl UserMembershipRepository for DropsReplyAfterCommit {
        async fn load_current(&self, user_id: &UserId) -> Result<Option<UserMembership>, DomainError> {
            self.inner.load_current(user_id).await
        }

        async fn insert(&self, membership: &UserMembership) -> Result<(), DomainError> {
            self.inner.insert(membership).await
        }

        async fn save(&self, membership: &UserMembership, expected: i32) -> Result<(), DomainError> {
            self.inner.save(membership, expected).await?;
            if self.saves.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(DomainError::database("connection reset after commit"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn lost_reply_after_commit_is_not_replayed() {
        let f = Fixture::new();
        let basic = f.plan("Basis", 29900, 0).await;
        let premium = f.plan("Premium", 59900, 0).await;
        let before = f.subscribe("m1", &basic).await;
        let repo = Arc::new(DropsReplyAfterCommit {
            inner: f.memberships.clone(),
            saves: AtomicU32::new(0),
        });

        let err = ChangeMembershipHandler::new(
            repo.clone(),
            f.plans.clone(),
            f.rules.clone(),
            f.clock.clone(),
            f.storage,
        )
        .handle(cmd("m1", &premium))
        .await
        .unwrap_err();

        assert!(matches!(err, MembershipError::StorageUnavailable(_)));
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
        let stored = f.current("m1").await.unwrap();
        assert_eq!(stored.membership_id, premium.id);
        assert_eq!(stored.version, before.version + 1);
    }
}
