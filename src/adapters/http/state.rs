//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use crate::application::handlers::klippekort::{
    AdjustKlippekortHandler, ConsumeKlippekortHandler, CreateKlippekortPackageHandler,
    GetKlippekortHandler, ListKlippekortPackagesHandler, PurchaseKlippekortHandler,
};
use crate::application::handlers::membership::{
    AddMembershipHandler, AssignDefaultMembershipHandler, CancelMembershipHandler,
    ChangeMembershipHandler, CreateMembershipPlanHandler, FreezeMembershipHandler,
    GetMembershipHandler, GetRulesHandler, ListMembershipPlansHandler, RemoveMembershipHandler,
    UpdateMembershipPlanHandler, UpdateRulesHandler,
};
use crate::application::{RuleConfiguration, StoragePolicy};
use crate::ports::{
    AdminAuthorizer, Clock, KlippekortCatalog, MembershipCatalog, SessionResolver,
    UserKlippekortRepository, UserMembershipRepository,
};

/// Ports and settings shared by every request.
///
/// Cloned per request; all dependencies are `Arc`-wrapped. Handlers are
/// built on demand from the shared ports.
#[derive(Clone)]
pub struct AppState {
    pub memberships: Arc<dyn UserMembershipRepository>,
    pub klippekort: Arc<dyn UserKlippekortRepository>,
    pub membership_catalog: Arc<dyn MembershipCatalog>,
    pub klippekort_catalog: Arc<dyn KlippekortCatalog>,
    pub rules: Arc<RuleConfiguration>,
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<dyn SessionResolver>,
    pub authorizer: Arc<dyn AdminAuthorizer>,
    pub storage: StoragePolicy,
    /// Window for the "ending soon" and "expiring soon" flags.
    pub expiry_warning_days: i64,
}

impl AppState {
    // ── Membership ──────────────────────────────────────────────────────────

    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(
            self.memberships.clone(),
            self.membership_catalog.clone(),
            self.clock.clone(),
            self.storage,
            self.expiry_warning_days,
        )
    }

    pub fn add_membership_handler(&self) -> AddMembershipHandler {
        AddMembershipHandler::new(
            self.memberships.clone(),
            self.membership_catalog.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn assign_default_membership_handler(&self) -> AssignDefaultMembershipHandler {
        AssignDefaultMembershipHandler::new(
            self.memberships.clone(),
            self.membership_catalog.clone(),
            self.rules.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn change_membership_handler(&self) -> ChangeMembershipHandler {
        ChangeMembershipHandler::new(
            self.memberships.clone(),
            self.membership_catalog.clone(),
            self.rules.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn cancel_membership_handler(&self) -> CancelMembershipHandler {
        CancelMembershipHandler::new(self.memberships.clone(), self.clock.clone(), self.storage)
    }

    pub fn remove_membership_handler(&self) -> RemoveMembershipHandler {
        RemoveMembershipHandler::new(
            self.memberships.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn freeze_membership_handler(&self) -> FreezeMembershipHandler {
        FreezeMembershipHandler::new(
            self.memberships.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn list_plans_handler(&self) -> ListMembershipPlansHandler {
        ListMembershipPlansHandler::new(self.membership_catalog.clone(), self.storage)
    }

    pub fn create_plan_handler(&self) -> CreateMembershipPlanHandler {
        CreateMembershipPlanHandler::new(
            self.membership_catalog.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn update_plan_handler(&self) -> UpdateMembershipPlanHandler {
        UpdateMembershipPlanHandler::new(
            self.membership_catalog.clone(),
            self.authorizer.clone(),
            self.storage,
        )
    }

    pub fn get_rules_handler(&self) -> GetRulesHandler {
        GetRulesHandler::new(self.rules.clone(), self.authorizer.clone(), self.storage)
    }

    pub fn update_rules_handler(&self) -> UpdateRulesHandler {
        UpdateRulesHandler::new(
            self.rules.clone(),
            self.membership_catalog.clone(),
            self.authorizer.clone(),
            self.storage,
        )
    }

    // ── Klippekort ──────────────────────────────────────────────────────────

    pub fn get_klippekort_handler(&self) -> GetKlippekortHandler {
        GetKlippekortHandler::new(
            self.klippekort.clone(),
            self.klippekort_catalog.clone(),
            self.clock.clone(),
            self.storage,
            self.expiry_warning_days,
        )
    }

    pub fn purchase_klippekort_handler(&self) -> PurchaseKlippekortHandler {
        PurchaseKlippekortHandler::new(
            self.klippekort.clone(),
            self.klippekort_catalog.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn consume_klippekort_handler(&self) -> ConsumeKlippekortHandler {
        ConsumeKlippekortHandler::new(self.klippekort.clone(), self.clock.clone(), self.storage)
    }

    pub fn adjust_klippekort_handler(&self) -> AdjustKlippekortHandler {
        AdjustKlippekortHandler::new(
            self.klippekort.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }

    pub fn list_packages_handler(&self) -> ListKlippekortPackagesHandler {
        ListKlippekortPackagesHandler::new(self.klippekort_catalog.clone(), self.storage)
    }

    pub fn create_package_handler(&self) -> CreateKlippekortPackageHandler {
        CreateKlippekortPackageHandler::new(
            self.klippekort_catalog.clone(),
            self.authorizer.clone(),
            self.clock.clone(),
            self.storage,
        )
    }
}
