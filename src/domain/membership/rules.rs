//! Studio-wide membership policy.

use crate::domain::foundation::MembershipId;
use serde::{Deserialize, Serialize};

use super::PlanChange;

/// Policy consulted before every plan change.
///
/// Singleton per studio. Missing configuration falls back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRules {
    pub allow_upgrades: bool,
    pub allow_downgrades: bool,
    /// When both plans carry a binding, keep the later of the two end dates.
    pub combine_binding_periods: bool,
    pub allow_change_during_binding: bool,
    /// Plan assigned to newly registered users, if any.
    pub default_membership_id: Option<MembershipId>,
}

impl Default for MembershipRules {
    fn default() -> Self {
        Self {
            allow_upgrades: true,
            allow_downgrades: false,
            combine_binding_periods: false,
            allow_change_during_binding: false,
            default_membership_id: None,
        }
    }
}

impl MembershipRules {
    /// Whether the change direction is allowed. Lateral moves follow the
    /// upgrade policy.
    pub fn permits(&self, change: PlanChange) -> bool {
        match change {
            PlanChange::Upgrade | PlanChange::Lateral => self.allow_upgrades,
            PlanChange::Downgrade => self.allow_downgrades,
        }
    }
}
