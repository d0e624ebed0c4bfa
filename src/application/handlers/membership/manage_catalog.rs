//! Membership plan catalog handlers.
//!
//! Staff create plans and later edit only price and availability. Members
//! see the active plans, cheapest first.

use std::sync::Arc;

use crate::application::authorization::require_admin;
use crate::application::StoragePolicy;
use crate::domain::foundation::{MembershipId, Timestamp, UserId};
use crate::domain::membership::{Membership, MembershipError, NewMembershipPlan};
use crate::ports::{AdminAuthorizer, Clock, MembershipCatalog};

// ════════════════════════════════════════════════════════════════════════════
// Create
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct CreateMembershipPlanCommand {
    pub actor: UserId,
    pub plan: NewMembershipPlan,
}

pub struct CreateMembershipPlanHandler {
    catalog: Arc<dyn MembershipCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl CreateMembershipPlanHandler {
    pub fn new(
        catalog: Arc<dyn MembershipCatalog>,
        authorizer: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            catalog,
            authorizer,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateMembershipPlanCommand,
    ) -> Result<Membership, MembershipError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        let plan = Membership::create(cmd.plan, Timestamp::from_datetime(self.clock.now()))?;
        let catalog = &self.catalog;
        self.storage
            .write("insert_plan", || catalog.insert(&plan))
            .await?;

        tracing::info!(membership_id = %plan.id, name = %plan.name, price = plan.price, "membership plan created");
        Ok(plan)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Update
// ════════════════════════════════════════════════════════════════════════════

/// Price and availability edit. `None` leaves the field as is.
#[derive(Debug, Clone)]
pub struct UpdateMembershipPlanCommand {
    pub actor: UserId,
    pub membership_id: MembershipId,
    pub price: Option<i64>,
    pub active: Option<bool>,
}

pub struct UpdateMembershipPlanHandler {
    catalog: Arc<dyn MembershipCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    storage: StoragePolicy,
}

impl UpdateMembershipPlanHandler {
    pub fn new(
        catalog: Arc<dyn MembershipCatalog>,
        authorizer: Arc<dyn AdminAuthorizer>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            catalog,
            authorizer,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMembershipPlanCommand,
    ) -> Result<Membership, MembershipError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        let catalog = &self.catalog;
        let mut plan = self
            .storage
            .call("find_plan", || catalog.find(&cmd.membership_id))
            .await?
            .ok_or(MembershipError::plan_not_found(cmd.membership_id))?;

        if let Some(price) = cmd.price {
            plan.set_price(price)?;
        }
        if let Some(active) = cmd.active {
            plan.set_active(active);
        }

        self.storage
            .call("update_plan", || catalog.update(&plan))
            .await?;

        tracing::info!(
            membership_id = %plan.id,
            price = plan.price,
            active = plan.active,
            actor = %cmd.actor,
            "membership plan updated"
        );
        Ok(plan)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// List
// ════════════════════════════════════════════════════════════════════════════

/// Lists the plans members can subscribe to.
pub struct ListMembershipPlansHandler {
    catalog: Arc<dyn MembershipCatalog>,
    storage: StoragePolicy,
}

impl ListMembershipPlansHandler {
    pub fn new(catalog: Arc<dyn MembershipCatalog>, storage: StoragePolicy) -> Self {
        Self { catalog, storage }
    }

    pub async fn handle(&self) -> Result<Vec<Membership>, MembershipError> {
        let catalog = &self.catalog;
        Ok(self
            .storage
            .call("list_plans", || catalog.list(true))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture, ADMIN};

    fn new_plan(name: &str, price: i64) -> NewMembershipPlan {
        NewMembershipPlan {
            name: name.to_string(),
            price,
            commitment_months: 12,
            student_senior_eligible: true,
            special_offer: false,
            description: "Ubegrenset trening".to_string(),
            features: vec!["Alle timer".to_string()],
        }
    }

    fn create_handler(f: &Fixture) -> CreateMembershipPlanHandler {
        CreateMembershipPlanHandler::new(f.plans.clone(), f.auth.clone(), f.clock.clone(), f.storage)
    }

    fn update_handler(f: &Fixture) -> UpdateMembershipPlanHandler {
        UpdateMembershipPlanHandler::new(f.plans.clone(), f.auth.clone(), f.storage)
    }

    #[tokio::test]
    async fn admin_creates_active_plan() {
        let f = Fixture::new();
        let plan = create_handler(&f)
            .handle(CreateMembershipPlanCommand {
                actor: user(ADMIN),
                plan: new_plan("  Premium ", 69900),
            })
            .await
            .unwrap();

        assert_eq!(plan.name, "Premium");
        assert!(plan.active);
        assert_eq!(f.plans.find(&plan.id).await.unwrap(), Some(plan));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let f = Fixture::new();
        let err = create_handler(&f)
            .handle(CreateMembershipPlanCommand {
                actor: user(ADMIN),
                plan: new_plan("Premium", -1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::ValidationFailed { ref field, .. } if field == "price"));
    }

    #[tokio::test]
    async fn member_cannot_create_plans() {
        let f = Fixture::new();
        let err = create_handler(&f)
            .handle(CreateMembershipPlanCommand {
                actor: user("m1"),
                plan: new_plan("Premium", 69900),
            })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::Forbidden);
    }

    #[tokio::test]
    async fn deactivated_plan_disappears_from_listing() {
        let f = Fixture::new();
        let basis = f.plan("Basis", 39900, 0).await;
        let premium = f.plan("Premium", 69900, 0).await;

        update_handler(&f)
            .handle(UpdateMembershipPlanCommand {
                actor: user(ADMIN),
                membership_id: premium.id,
                price: None,
                active: Some(false),
            })
            .await
            .unwrap();

        let listed = ListMembershipPlansHandler::new(f.plans.clone(), f.storage)
            .handle()
            .await
            .unwrap();
        assert_eq!(listed, vec![basis]);
    }

    #[tokio::test]
    async fn price_edit_leaves_other_fields() {
        let f = Fixture::new();
        let basis = f.plan("Basis", 39900, 12).await;

        let updated = update_handler(&f)
            .handle(UpdateMembershipPlanCommand {
                actor: user(ADMIN),
                membership_id: basis.id,
                price: Some(42900),
                active: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.price, 42900);
        assert_eq!(updated.commitment_months, 12);
        assert!(updated.active);
    }

    #[tokio::test]
    async fn updating_unknown_plan_is_not_found() {
        let f = Fixture::new();
        let missing = MembershipId::new();
        let err = update_handler(&f)
            .handle(UpdateMembershipPlanCommand {
                actor: user(ADMIN),
                membership_id: missing,
                price: Some(1),
                active: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::plan_not_found(missing));
    }
}
