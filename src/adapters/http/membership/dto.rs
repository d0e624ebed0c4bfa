//! HTTP DTOs (Data Transfer Objects) for membership endpoints.
//!
//! These types define the JSON request/response structure for the membership API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::membership::{
    AddMembershipResult, ChangeMembershipResult, FreezeMembershipResult, MembershipWithDetails,
};
use crate::domain::foundation::MembershipId;
use crate::domain::membership::{Membership, PlanChange, UserMembership};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request naming a plan, used to subscribe and to change plan.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSelectionRequest {
    pub membership_id: MembershipId,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for the caller's current subscription.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    /// The subscription with billing details, or null if none exists.
    pub membership: Option<MembershipWithDetails>,
}

/// A new subscription together with its plan.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub membership: UserMembership,
    pub plan: Membership,
}

impl From<AddMembershipResult> for SubscriptionResponse {
    fn from(result: AddMembershipResult) -> Self {
        Self {
            membership: result.membership,
            plan: result.plan,
        }
    }
}

/// Result of a plan change.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeMembershipResponse {
    pub membership: UserMembership,
    pub previous_membership_id: MembershipId,
    /// `upgrade`, `downgrade` or `lateral`.
    pub change: &'static str,
}

impl From<ChangeMembershipResult> for ChangeMembershipResponse {
    fn from(result: ChangeMembershipResult) -> Self {
        Self {
            membership: result.membership,
            previous_membership_id: result.previous_membership_id,
            change: match result.change {
                PlanChange::Upgrade => "upgrade",
                PlanChange::Downgrade => "downgrade",
                PlanChange::Lateral => "lateral",
            },
        }
    }
}

/// Result of a status transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    pub membership: UserMembership,
    /// False when the subscription was already in the requested state.
    pub changed: bool,
}

impl From<FreezeMembershipResult> for TransitionResponse {
    fn from(result: FreezeMembershipResult) -> Self {
        Self {
            membership: result.membership,
            changed: result.outcome.is_applied(),
        }
    }
}

/// Active plans offered to members.
#[derive(Debug, Clone, Serialize)]
pub struct PlanListResponse {
    pub memberships: Vec<Membership>,
}
