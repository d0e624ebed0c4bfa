//! FreezeMembershipHandler - Command handler for the freeze workflow.
//!
//! Members request, withdraw and end freezes; staff approve or reject
//! pending requests. Re-applying a request or an unfreeze is a no-op.

use std::sync::Arc;

use crate::application::authorization::{require_admin, require_self_or_admin};
use crate::application::StoragePolicy;
use crate::domain::foundation::{LocalTime, UserId};
use crate::domain::membership::{MembershipError, TransitionOutcome, UserMembership};
use crate::ports::{AdminAuthorizer, Clock, UserMembershipRepository};

use super::updater::MembershipUpdater;

/// Step in the freeze workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeAction {
    /// active -> freeze_requested
    Request,
    /// freeze_requested -> active
    CancelRequest,
    /// frozen | freeze_requested -> active
    Unfreeze,
    /// freeze_requested -> frozen (staff only)
    Approve,
    /// freeze_requested -> active (staff only)
    Reject,
}

impl FreezeAction {
    pub fn requires_admin(&self) -> bool {
        matches!(self, FreezeAction::Approve | FreezeAction::Reject)
    }

    fn apply(
        &self,
        membership: &mut UserMembership,
        now: &LocalTime,
    ) -> Result<TransitionOutcome, MembershipError> {
        match self {
            FreezeAction::Request => membership.request_freeze(now),
            FreezeAction::CancelRequest => membership.cancel_freeze_request(now),
            FreezeAction::Unfreeze => membership.unfreeze(now),
            FreezeAction::Approve => membership.approve_freeze(now),
            FreezeAction::Reject => membership.reject_freeze(now),
        }
    }
}

/// Command to move a subscription through the freeze workflow.
#[derive(Debug, Clone)]
pub struct FreezeMembershipCommand {
    pub actor: UserId,
    pub user_id: UserId,
    pub action: FreezeAction,
}

/// Result of a freeze workflow step.
#[derive(Debug, Clone)]
pub struct FreezeMembershipResult {
    pub membership: UserMembership,
    pub outcome: TransitionOutcome,
}

/// Handler for freeze, unfreeze and freeze approval.
pub struct FreezeMembershipHandler {
    updater: MembershipUpdater,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl FreezeMembershipHandler {
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
        cmd: FreezeMembershipCommand,
    ) -> Result<FreezeMembershipResult, MembershipError> {
        if cmd.action.requires_admin() {
            require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;
        } else {
            require_self_or_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor, &cmd.user_id)
                .await?;
        }

        let clock = &self.clock;
        let action = cmd.action;
        let (membership, outcome) = self
            .updater
            .update(&cmd.user_id, move |mut current| async move {
                let outcome = action.apply(&mut current, &clock.now())?;
                Ok((current, outcome))
            })
            .await
            .map_err(|e| {
                tracing::debug!(user_id = %cmd.user_id, ?action, error = %e, "freeze step rejected");
                e
            })?;

        if outcome.is_applied() {
            tracing::info!(
                user_id = %cmd.user_id,
                actor = %cmd.actor,
                ?action,
                status = %membership.status,
                "freeze status changed"
            );
        }

        Ok(FreezeMembershipResult {
            membership,
            outcome,
        })
    }
}
