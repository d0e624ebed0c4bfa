//! AddMembershipHandler - Command handler for starting subscriptions.
//!
//! Also hosts `AssignDefaultMembershipHandler`, which subscribes newly
//! registered users to the studio's default plan.

use std::sync::Arc;

use crate::application::authorization::require_self_or_admin;
use crate::application::{RuleConfiguration, StoragePolicy};
use crate::domain::foundation::{ErrorCode, MembershipId, UserId};
use crate::domain::membership::{Membership, MembershipError, UserMembership};
use crate::ports::{AdminAuthorizer, Clock, MembershipCatalog, UserMembershipRepository};

/// Command to subscribe a user to a plan.
#[derive(Debug, Clone)]
pub struct AddMembershipCommand {
    /// Who is asking. Members subscribe themselves; staff may subscribe anyone.
    pub actor: UserId,
    pub user_id: UserId,
    pub membership_id: MembershipId,
}

/// Result of a successful subscription.
#[derive(Debug, Clone)]
pub struct AddMembershipResult {
    pub membership: UserMembership,
    pub plan: Membership,
}

/// Handler for creating subscriptions.
pub struct AddMembershipHandler {
    memberships: Arc<dyn UserMembershipRepository>,
    catalog: Arc<dyn MembershipCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl AddMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        catalog: Arc<dyn MembershipCatalog>,
        authorizer: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            memberships,
            catalog,
            authorizer,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddMembershipCommand,
    ) -> Result<AddMembershipResult, MembershipError> {
        require_self_or_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor, &cmd.user_id)
            .await?;

        // 1. Resolve the plan
        let catalog = &self.catalog;
        let plan = self
            .storage
            .call("find_plan", || catalog.find(&cmd.membership_id))
            .await?
            .ok_or(MembershipError::plan_not_found(cmd.membership_id))?;

        // 2. One current subscription per user
        let memberships = &self.memberships;
        if self
            .storage
            .call("load_current_membership", || memberships.load_current(&cmd.user_id))
            .await?
            .is_some()
        {
            return Err(MembershipError::already_exists(cmd.user_id));
        }

        // 3. Create and persist
        let membership = UserMembership::subscribe(cmd.user_id.clone(), &plan, &self.clock.now())?;
        insert_subscription(memberships, &self.storage, &membership).await?;

        tracing::info!(
            user_id = %membership.user_id,
            membership_id = %plan.id,
            actor = %cmd.actor,
            "membership added"
        );

        Ok(AddMembershipResult { membership, plan })
    }
}

/// Inserts a subscription, reporting a lost race on the one-per-user
/// constraint as `AlreadyExists`.
async fn insert_subscription(
    memberships: &Arc<dyn UserMembershipRepository>,
    storage: &StoragePolicy,
    membership: &UserMembership,
) -> Result<(), MembershipError> {
    storage
        .write("insert_membership", || memberships.insert(membership))
        .await
        .map_err(|e| {
            if e.code == ErrorCode::MembershipExists {
                MembershipError::already_exists(membership.user_id.clone())
            } else {
                e.into()
            }
        })
}

/// Command to give a newly registered user the default plan.
#[derive(Debug, Clone)]
pub struct AssignDefaultMembershipCommand {
    pub user_id: UserId,
}

/// Handler for default plan assignment.
///
/// A no-op when no default plan is configured, the plan is gone or
/// retired, or the user already has a subscription.
pub struct AssignDefaultMembershipHandler {
    memberships: Arc<dyn UserMembershipRepository>,
    catalog: Arc<dyn MembershipCatalog>,
    rules: Arc<RuleConfiguration>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl AssignDefaultMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        catalog: Arc<dyn MembershipCatalog>,
        rules: Arc<RuleConfiguration>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            memberships,
            catalog,
            rules,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: AssignDefaultMembershipCommand,
    ) -> Result<Option<UserMembership>, MembershipError> {
        let Some(default_id) = self.rules.current().await?.default_membership_id else {
            return Ok(None);
        };

        let catalog = &self.catalog;
        let plan = match self
            .storage
            .call("find_plan", || catalog.find(&default_id))
            .await?
        {
            Some(plan) if plan.active => plan,
            _ => {
                tracing::warn!(membership_id = %default_id, "default membership plan unavailable");
                return Ok(None);
            }
        };

        let memberships = &self.memberships;
        if self
            .storage
            .call("load_current_membership", || memberships.load_current(&cmd.user_id))
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let membership = UserMembership::subscribe(cmd.user_id.clone(), &plan, &self.clock.now())?;
        match insert_subscription(memberships, &self.storage, &membership).await {
            Ok(()) => {}
            Err(MembershipError::AlreadyExists(_)) => return Ok(None),
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %cmd.user_id, membership_id = %plan.id, "default membership assigned");
        Ok(Some(membership))
    }
}
