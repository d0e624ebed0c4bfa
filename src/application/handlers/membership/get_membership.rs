//! GetMembershipHandler - Query handler for a member's subscription view.

use std::sync::Arc;

use serde::Serialize;

use crate::application::StoragePolicy;
use crate::domain::billing;
use crate::domain::foundation::{
    LocalTime, MembershipId, Timestamp, UserId, UserMembershipId,
};
use crate::domain::membership::{Membership, MembershipError, MembershipStatus, UserMembership};
use crate::ports::{Clock, MembershipCatalog, UserMembershipRepository};

/// Query for a user's current subscription.
#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub user_id: UserId,
}

/// Subscription joined with its plan and the derived billing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipWithDetails {
    pub id: UserMembershipId,
    pub membership_id: MembershipId,
    pub plan_name: String,
    pub plan_price: i64,
    pub commitment_months: u32,
    pub status: MembershipStatus,
    pub start_date: Timestamp,
    pub renewal_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub binding_end: Option<Timestamp>,
    pub last_billed: Option<Timestamp>,
    pub days_until_renewal: i64,
    pub months_until_binding_end: u32,
    pub binding_active: bool,
    pub can_cancel: bool,
    pub binding_ending_soon: bool,
}

impl MembershipWithDetails {
    /// Derives the billing fields as of `now`.
    pub fn build(
        membership: &UserMembership,
        plan: &Membership,
        now: &LocalTime,
        expiry_warning_days: i64,
    ) -> Self {
        let binding_end = membership.binding_end.as_ref();
        Self {
            id: membership.id,
            membership_id: membership.membership_id,
            plan_name: plan.name.clone(),
            plan_price: plan.price,
            commitment_months: plan.commitment_months,
            status: membership.status,
            start_date: membership.start_date,
            renewal_date: membership.renewal_date,
            end_date: membership.end_date,
            binding_end: membership.binding_end,
            last_billed: membership.last_billed,
            days_until_renewal: billing::days_until(&membership.renewal_date, now),
            months_until_binding_end: binding_end
                .map(|end| billing::months_until_binding_end(end, now))
                .unwrap_or(0),
            binding_active: billing::within_binding(binding_end, now),
            can_cancel: membership.status == MembershipStatus::Active
                && billing::can_cancel(binding_end, now),
            binding_ending_soon: binding_end
                .map(|end| billing::is_expiring_soon(end, now, expiry_warning_days))
                .unwrap_or(false),
        }
    }
}

/// `None` when the user has no current subscription.
pub type GetMembershipResult = Option<MembershipWithDetails>;

/// Handler for the subscription view.
pub struct GetMembershipHandler {
    memberships: Arc<dyn UserMembershipRepository>,
    catalog: Arc<dyn MembershipCatalog>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
    expiry_warning_days: i64,
}

impl GetMembershipHandler {
    pub fn new(
        memberships: Arc<dyn UserMembershipRepository>,
        catalog: Arc<dyn MembershipCatalog>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
        expiry_warning_days: i64,
    ) -> Self {
        Self {
            memberships,
            catalog,
            clock,
            storage,
            expiry_warning_days,
        }
    }

    pub async fn handle(
        &self,
        query: GetMembershipQuery,
    ) -> Result<GetMembershipResult, MembershipError> {
        let memberships = &self.memberships;
        let Some(membership) = self
            .storage
            .call("load_current_membership", || memberships.load_current(&query.user_id))
            .await?
        else {
            return Ok(None);
        };

        let catalog = &self.catalog;
        let plan = self
            .storage
            .call("find_plan", || catalog.find(&membership.membership_id))
            .await?
            .ok_or(MembershipError::plan_not_found(membership.membership_id))?;

        Ok(Some(MembershipWithDetails::build(
            &membership,
            &plan,
            &self.clock.now(),
            self.expiry_warning_days,
        )))
    }
}
