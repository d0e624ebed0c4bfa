//! HTTP DTOs for staff endpoints.
//!
//! Rules, new plans and new packages are accepted in their domain shape
//! (`MembershipRules`, `NewMembershipPlan`, `NewKlippekortPackage`).

use serde::Deserialize;

use crate::domain::foundation::MembershipId;

/// Subscribe a member to a plan on their behalf.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignMembershipRequest {
    pub membership_id: MembershipId,
}

/// Partial plan edit. Only price and the active flag can change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Set a card's balance.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustKlippekortRequest {
    pub remaining_klipp: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_edit_fields_are_optional() {
        let request: UpdatePlanRequest = serde_json::from_str(r#"{"active":false}"#).unwrap();
        assert_eq!(request.price, None);
        assert_eq!(request.active, Some(false));
    }
}
