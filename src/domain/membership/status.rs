//! Membership status state machine.
//!
//! Defines the states a subscription moves through and which transitions
//! are structurally possible. Business guards (binding periods, change
//! policy) live on the aggregate.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Paying member with full access.
    Active,

    /// Member asked for a freeze; waiting for staff approval.
    FreezeRequested,

    /// Freeze approved by staff. Membership is suspended.
    Frozen,

    /// Subscription ended. A new one may be created.
    Cancelled,
}

impl MembershipStatus {
    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::FreezeRequested => "freeze_requested",
            MembershipStatus::Frozen => "frozen",
            MembershipStatus::Cancelled => "cancelled",
        }
    }

    /// True for both the pending and the approved freeze state.
    pub fn is_frozen_or_requested(&self) -> bool {
        matches!(self, MembershipStatus::FreezeRequested | MembershipStatus::Frozen)
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MembershipStatus::Active),
            "freeze_requested" => Ok(MembershipStatus::FreezeRequested),
            "frozen" => Ok(MembershipStatus::Frozen),
            "cancelled" => Ok(MembershipStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown membership status '{}'", other),
            )),
        }
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            // From ACTIVE
            (Active, FreezeRequested)
                | (Active, Cancelled)
                | (Active, Active) // Plan change
            // From FREEZE_REQUESTED
                | (FreezeRequested, Active)
                | (FreezeRequested, Frozen)
                | (FreezeRequested, Cancelled) // Administrative termination
            // From FROZEN
                | (Frozen, Active)
                | (Frozen, Cancelled) // Administrative termination
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            Active => vec![FreezeRequested, Cancelled, Active],
            FreezeRequested => vec![Active, Frozen, Cancelled],
            Frozen => vec![Active, Cancelled],
            Cancelled => vec![],
        }
    }
}
