//! Membership plan catalog entity.
//!
//! A plan is created by an administrator and afterwards only its price and
//! active flag change. Plans are never deleted, only deactivated.

use crate::domain::foundation::{MembershipId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// A purchasable membership plan.
///
/// Prices are integer øre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub name: String,
    pub price: i64,
    /// Binding length in months; 0 means no binding.
    pub commitment_months: u32,
    pub student_senior_eligible: bool,
    pub special_offer: bool,
    pub description: String,
    pub features: Vec<String>,
    pub active: bool,
    pub created_at: Timestamp,
}

/// Input for creating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMembershipPlan {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub commitment_months: u32,
    #[serde(default)]
    pub student_senior_eligible: bool,
    #[serde(default)]
    pub special_offer: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Direction of a plan change, judged by price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanChange {
    Upgrade,
    Downgrade,
    Lateral,
}

impl Membership {
    /// Validates input and creates an active plan.
    pub fn create(input: NewMembershipPlan, created_at: Timestamp) -> Result<Self, ValidationError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        validate_price(input.price)?;

        Ok(Self {
            id: MembershipId::new(),
            name,
            price: input.price,
            commitment_months: input.commitment_months,
            student_senior_eligible: input.student_senior_eligible,
            special_offer: input.special_offer,
            description: input.description,
            features: input.features,
            active: true,
            created_at,
        })
    }

    /// True if subscribing starts a binding period.
    pub fn has_binding(&self) -> bool {
        self.commitment_months > 0
    }

    /// Classifies moving from this plan to `target`.
    pub fn classify_change(&self, target: &Membership) -> PlanChange {
        match target.price.cmp(&self.price) {
            std::cmp::Ordering::Greater => PlanChange::Upgrade,
            std::cmp::Ordering::Less => PlanChange::Downgrade,
            std::cmp::Ordering::Equal => PlanChange::Lateral,
        }
    }

    pub fn set_price(&mut self, price: i64) -> Result<(), ValidationError> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price < 0 {
        return Err(ValidationError::out_of_range("price", 0, i64::MAX, price));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: i64, commitment_months: u32) -> NewMembershipPlan {
        NewMembershipPlan {
            name: name.to_string(),
            price,
            commitment_months,
            student_senior_eligible: false,
            special_offer: false,
            description: String::new(),
            features: vec![],
        }
    }

    #[test]
    fn create_trims_name_and_starts_active() {
        let plan = Membership::create(input("  Basis  ", 49900, 12), Timestamp::now()).unwrap();
        assert_eq!(plan.name, "Basis");
        assert!(plan.active);
        assert!(plan.has_binding());
    }

    #[test]
    fn create_rejects_empty_name() {
        assert!(Membership::create(input(" ", 100, 0), Timestamp::now()).is_err());
    }

    #[test]
    fn create_rejects_negative_price() {
        assert!(Membership::create(input("Basis", -1, 0), Timestamp::now()).is_err());
    }

    #[test]
    fn no_commitment_means_no_binding() {
        let plan = Membership::create(input("Flex", 59900, 0), Timestamp::now()).unwrap();
        assert!(!plan.has_binding());
    }

    #[test]
    fn classify_change_compares_prices() {
        let basic = Membership::create(input("Basis", 39900, 0), Timestamp::now()).unwrap();
        let premium = Membership::create(input("Premium", 69900, 0), Timestamp::now()).unwrap();
        let other = Membership::create(input("Yoga", 39900, 0), Timestamp::now()).unwrap();

        assert_eq!(basic.classify_change(&premium), PlanChange::Upgrade);
        assert_eq!(premium.classify_change(&basic), PlanChange::Downgrade);
        assert_eq!(basic.classify_change(&other), PlanChange::Lateral);
    }

    #[test]
    fn set_price_validates() {
        let mut plan = Membership::create(input("Basis", 100, 0), Timestamp::now()).unwrap();
        assert!(plan.set_price(-5).is_err());
        assert_eq!(plan.price, 100);
        plan.set_price(200).unwrap();
        assert_eq!(plan.price, 200);
    }
}
