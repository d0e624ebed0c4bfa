//! Membership domain module.
//!
//! Plan catalog, studio rules and the subscription state machine.
//!
//! # Module Structure
//!
//! - `aggregate` - UserMembership subscription aggregate
//! - `errors` - MembershipError taxonomy
//! - `plan` - Membership catalog entity and change classification
//! - `rules` - MembershipRules policy
//! - `status` - MembershipStatus state machine

mod aggregate;
mod errors;
mod plan;
mod rules;
mod status;

pub use aggregate::{TransitionOutcome, UserMembership};
pub use errors::MembershipError;
pub use plan::{Membership, NewMembershipPlan, PlanChange};
pub use rules::MembershipRules;
pub use status::MembershipStatus;
