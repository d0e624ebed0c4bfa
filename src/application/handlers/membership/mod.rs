//! Membership handlers.
//!
//! Command and query handlers for the subscription lifecycle:
//!
//! ## Commands
//! - Adding a subscription, or assigning the default plan on registration
//! - Changing plan under the studio rules
//! - Freeze requests, approval and unfreezing
//! - Cancelling (member) and terminating (staff)
//! - Rule and plan catalog administration
//!
//! ## Queries
//! - Subscription view with derived billing fields
//! - Studio rules (admin)
//! - Active plan listing

mod add_membership;
mod cancel_membership;
mod change_membership;
mod freeze_membership;
mod get_membership;
mod manage_catalog;
mod manage_rules;
mod updater;

// Commands
pub use add_membership::{
    AddMembershipCommand, AddMembershipHandler, AddMembershipResult,
    AssignDefaultMembershipCommand, AssignDefaultMembershipHandler,
};
pub use cancel_membership::{
    CancelMembershipCommand, CancelMembershipHandler, CancelMembershipResult,
    RemoveMembershipCommand, RemoveMembershipHandler,
};
pub use change_membership::{ChangeMembershipCommand, ChangeMembershipHandler, ChangeMembershipResult};
pub use freeze_membership::{
    FreezeAction, FreezeMembershipCommand, FreezeMembershipHandler, FreezeMembershipResult,
};
pub use manage_catalog::{
    CreateMembershipPlanCommand, CreateMembershipPlanHandler, ListMembershipPlansHandler,
    UpdateMembershipPlanCommand, UpdateMembershipPlanHandler,
};
pub use manage_rules::{GetRulesHandler, GetRulesQuery, UpdateRulesCommand, UpdateRulesHandler};

// Queries
pub use get_membership::{
    GetMembershipHandler, GetMembershipQuery, GetMembershipResult, MembershipWithDetails,
};
