//! UserMembership aggregate.
//!
//! A user's subscription to a catalog [`Membership`] plan. At most one
//! non-cancelled subscription exists per user; cancelled rows are kept as
//! history rather than deleted.
//!
//! # Design Decisions
//!
//! - **Injected time**: every operation takes `now` in the studio timezone
//! - **Versioned**: `version` backs compare-and-swap saves in the repository
//! - **Idempotent freeze toggles**: re-applying a freeze or unfreeze is a no-op

use crate::domain::billing;
use crate::domain::foundation::{
    LocalTime, MembershipId, OwnedByUser, StateMachine, Timestamp, UserId, UserMembershipId,
};
use serde::{Deserialize, Serialize};

use super::{Membership, MembershipError, MembershipRules, MembershipStatus, PlanChange};

/// Whether an idempotent operation changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    Unchanged,
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied)
    }
}

/// UserMembership aggregate.
///
/// # Invariants
///
/// - `binding_end` is `None` iff the plan subscribed to has no commitment
/// - `end_date` is set only once the status is `Cancelled`
/// - `Cancelled` is terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMembership {
    pub id: UserMembershipId,
    pub user_id: UserId,
    pub membership_id: MembershipId,
    pub status: MembershipStatus,
    pub start_date: Timestamp,
    /// Next billing date.
    pub renewal_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub binding_end: Option<Timestamp>,
    pub last_billed: Option<Timestamp>,
    /// Optimistic concurrency token.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserMembership {
    /// Starts a new active subscription to `plan`.
    ///
    /// Renewal is one month out; the binding period follows the plan's
    /// commitment.
    pub fn subscribe(
        user_id: UserId,
        plan: &Membership,
        now: &LocalTime,
    ) -> Result<Self, MembershipError> {
        if !plan.active {
            return Err(MembershipError::invalid_transition(format!(
                "plan '{}' is no longer offered",
                plan.name
            )));
        }

        let started = Timestamp::from_datetime(now.clone());
        Ok(Self {
            id: UserMembershipId::new(),
            user_id,
            membership_id: plan.id,
            status: MembershipStatus::Active,
            start_date: started,
            renewal_date: billing::add_months(now, 1),
            end_date: None,
            binding_end: billing::binding_end_from(now, plan.commitment_months),
            last_billed: Some(started),
            version: 0,
            created_at: started,
            updated_at: started,
        })
    }

    /// Member asks for a freeze. No-op when already frozen or requested.
    pub fn request_freeze(&mut self, now: &LocalTime) -> Result<TransitionOutcome, MembershipError> {
        if self.status.is_frozen_or_requested() {
            return Ok(TransitionOutcome::Unchanged);
        }
        self.transition(MembershipStatus::FreezeRequested, "request freeze", now)?;
        Ok(TransitionOutcome::Applied)
    }

    /// Member withdraws a pending freeze request. No-op when active.
    ///
    /// An approved freeze cannot be withdrawn; it has to be unfrozen.
    pub fn cancel_freeze_request(
        &mut self,
        now: &LocalTime,
    ) -> Result<TransitionOutcome, MembershipError> {
        match self.status {
            MembershipStatus::Active => Ok(TransitionOutcome::Unchanged),
            MembershipStatus::FreezeRequested => {
                self.transition(MembershipStatus::Active, "cancel freeze request", now)?;
                Ok(TransitionOutcome::Applied)
            }
            _ => Err(self.rejected("cancel freeze request")),
        }
    }

    /// Returns a frozen or freeze-requested subscription to active.
    pub fn unfreeze(&mut self, now: &LocalTime) -> Result<TransitionOutcome, MembershipError> {
        if self.status == MembershipStatus::Active {
            return Ok(TransitionOutcome::Unchanged);
        }
        self.transition(MembershipStatus::Active, "unfreeze", now)?;
        Ok(TransitionOutcome::Applied)
    }

    /// Staff grant a pending freeze request.
    pub fn approve_freeze(&mut self, now: &LocalTime) -> Result<TransitionOutcome, MembershipError> {
        match self.status {
            MembershipStatus::Frozen => Ok(TransitionOutcome::Unchanged),
            MembershipStatus::FreezeRequested => {
                self.transition(MembershipStatus::Frozen, "approve freeze", now)?;
                Ok(TransitionOutcome::Applied)
            }
            _ => Err(self.rejected("approve freeze")),
        }
    }

    /// Staff turn down a pending freeze request.
    pub fn reject_freeze(&mut self, now: &LocalTime) -> Result<TransitionOutcome, MembershipError> {
        match self.status {
            MembershipStatus::Active => Ok(TransitionOutcome::Unchanged),
            MembershipStatus::FreezeRequested => {
                self.transition(MembershipStatus::Active, "reject freeze", now)?;
                Ok(TransitionOutcome::Applied)
            }
            _ => Err(self.rejected("reject freeze")),
        }
    }

    /// Member cancels. Only allowed from `Active` once the binding period
    /// has elapsed.
    pub fn cancel(&mut self, now: &LocalTime) -> Result<(), MembershipError> {
        if self.status != MembershipStatus::Active {
            return Err(self.rejected("cancel"));
        }
        if let Some(end) = self.binding_end {
            if !billing::can_cancel(Some(&end), now) {
                return Err(MembershipError::binding_period_active(end));
            }
        }
        self.end(now)
    }

    /// Administrative termination. Skips the binding guard.
    pub fn terminate(&mut self, now: &LocalTime) -> Result<(), MembershipError> {
        self.end(now)
    }

    /// Moves the subscription to `target`, applying the studio rules.
    ///
    /// `current_plan` must be the plan this subscription currently points at.
    pub fn change_membership(
        &mut self,
        current_plan: &Membership,
        target: &Membership,
        rules: &MembershipRules,
        now: &LocalTime,
    ) -> Result<PlanChange, MembershipError> {
        if self.status != MembershipStatus::Active {
            return Err(self.rejected("change membership"));
        }
        if target.id == self.membership_id {
            return Err(MembershipError::invalid_transition(format!(
                "already subscribed to '{}'",
                target.name
            )));
        }
        if !target.active {
            return Err(MembershipError::invalid_transition(format!(
                "plan '{}' is no longer offered",
                target.name
            )));
        }

        let change = current_plan.classify_change(target);
        if !rules.permits(change) {
            let reason = match change {
                PlanChange::Downgrade => "downgrades are not allowed",
                PlanChange::Upgrade | PlanChange::Lateral => "upgrades are not allowed",
            };
            return Err(MembershipError::invalid_transition(reason));
        }

        if billing::within_binding(self.binding_end.as_ref(), now) && !rules.allow_change_during_binding
        {
            return Err(MembershipError::invalid_transition(
                "changes are not allowed during the binding period",
            ));
        }

        let fresh = billing::binding_end_from(now, target.commitment_months);
        self.binding_end = if rules.combine_binding_periods
            && current_plan.has_binding()
            && target.has_binding()
        {
            self.binding_end.max(fresh)
        } else {
            fresh
        };

        self.status = self
            .status
            .transition_to(MembershipStatus::Active)
            .map_err(|e| MembershipError::invalid_transition(e.to_string()))?;
        self.membership_id = target.id;
        self.updated_at = Timestamp::from_datetime(now.clone());
        Ok(change)
    }

    /// True while cancellation is blocked by the binding period.
    pub fn binding_active(&self, now: &LocalTime) -> bool {
        billing::within_binding(self.binding_end.as_ref(), now)
    }

    fn end(&mut self, now: &LocalTime) -> Result<(), MembershipError> {
        self.transition(MembershipStatus::Cancelled, "cancel", now)?;
        self.end_date = Some(Timestamp::from_datetime(now.clone()));
        Ok(())
    }

    fn transition(
        &mut self,
        target: MembershipStatus,
        action: &str,
        now: &LocalTime,
    ) -> Result<(), MembershipError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| self.rejected(action))?;
        self.updated_at = Timestamp::from_datetime(now.clone());
        Ok(())
    }

    fn rejected(&self, action: &str) -> MembershipError {
        MembershipError::invalid_transition(format!(
            "cannot {} a membership that is {}",
            action, self.status
        ))
    }
}

impl OwnedByUser for UserMembership {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}
