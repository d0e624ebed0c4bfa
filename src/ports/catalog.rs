//! Catalog ports for shared plan and package definitions.
//!
//! Catalog rows are referenced by many subscriptions and purchases and are
//! never deleted, only deactivated.

use crate::domain::foundation::{DomainError, KlippekortPackageId, MembershipId};
use crate::domain::klippekort::KlippekortPackage;
use crate::domain::membership::Membership;
use async_trait::async_trait;

/// Membership plan catalog.
#[async_trait]
pub trait MembershipCatalog: Send + Sync {
    async fn find(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError>;

    /// Plans ordered by price. `active_only` hides deactivated plans.
    async fn list(&self, active_only: bool) -> Result<Vec<Membership>, DomainError>;

    async fn insert(&self, plan: &Membership) -> Result<(), DomainError>;

    /// Persists price and active flag edits.
    ///
    /// # Errors
    ///
    /// - `MembershipPlanNotFound` if the plan doesn't exist
    async fn update(&self, plan: &Membership) -> Result<(), DomainError>;
}

/// Klippekort package catalog.
#[async_trait]
pub trait KlippekortCatalog: Send + Sync {
    async fn find(&self, id: &KlippekortPackageId) -> Result<Option<KlippekortPackage>, DomainError>;

    /// Packages ordered by price. `active_only` hides deactivated packages.
    async fn list(&self, active_only: bool) -> Result<Vec<KlippekortPackage>, DomainError>;

    async fn insert(&self, package: &KlippekortPackage) -> Result<(), DomainError>;
}
