//! In-Memory Catalogs
//!
//! Membership plans and klippekort packages for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, KlippekortPackageId, MembershipId};
use crate::domain::klippekort::KlippekortPackage;
use crate::domain::membership::Membership;
use crate::ports::{KlippekortCatalog, MembershipCatalog};

/// In-memory membership plan catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipCatalog {
    plans: Arc<RwLock<HashMap<MembershipId, Membership>>>,
}

impl InMemoryMembershipCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipCatalog for InMemoryMembershipCatalog {
    async fn find(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError> {
        Ok(self.plans.read().await.get(id).cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Membership>, DomainError> {
        let plans = self.plans.read().await;
        let mut list: Vec<Membership> = plans
            .values()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(list)
    }

    async fn insert(&self, plan: &Membership) -> Result<(), DomainError> {
        self.plans.write().await.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &Membership) -> Result<(), DomainError> {
        let mut plans = self.plans.write().await;
        let stored = plans.get_mut(&plan.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::MembershipPlanNotFound,
                format!("membership plan {} not found", plan.id),
            )
        })?;
        stored.price = plan.price;
        stored.active = plan.active;
        Ok(())
    }
}

/// In-memory klippekort package catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKlippekortCatalog {
    packages: Arc<RwLock<HashMap<KlippekortPackageId, KlippekortPackage>>>,
}

impl InMemoryKlippekortCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KlippekortCatalog for InMemoryKlippekortCatalog {
    async fn find(&self, id: &KlippekortPackageId) -> Result<Option<KlippekortPackage>, DomainError> {
        Ok(self.packages.read().await.get(id).cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<KlippekortPackage>, DomainError> {
        let packages = self.packages.read().await;
        let mut list: Vec<KlippekortPackage> = packages
            .values()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(list)
    }

    async fn insert(&self, package: &KlippekortPackage) -> Result<(), DomainError> {
        self.packages
            .write()
            .await
            .insert(package.id, package.clone());
        Ok(())
    }
}
