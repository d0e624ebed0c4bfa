//! GetKlippekortHandler - Query handler for a member's punch cards.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::StoragePolicy;
use crate::domain::billing;
use crate::domain::foundation::{
    KlippekortPackageId, LocalTime, Timestamp, UserId, UserKlippekortId,
};
use crate::domain::klippekort::{KlippekortError, KlippekortPackage, UserKlippekort};
use crate::ports::{Clock, KlippekortCatalog, UserKlippekortRepository};

#[derive(Debug, Clone)]
pub struct GetKlippekortQuery {
    pub user_id: UserId,
}

/// Punch card joined with its package and derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlippekortWithDetails {
    pub id: UserKlippekortId,
    pub package_id: KlippekortPackageId,
    pub package_name: String,
    pub category: String,
    pub total_klipp: u32,
    pub remaining_klipp: u32,
    pub used_klipp: u32,
    /// Percent of sessions still unused.
    pub progress_percentage: u8,
    pub price_per_session: i64,
    pub purchase_date: Timestamp,
    pub expiry_date: Timestamp,
    pub days_until_expiry: i64,
    pub is_expiring_soon: bool,
    pub is_expired: bool,
    pub active: bool,
}

impl KlippekortWithDetails {
    pub fn build(
        card: &UserKlippekort,
        package: &KlippekortPackage,
        now: &LocalTime,
        expiry_warning_days: i64,
    ) -> Self {
        Self {
            id: card.id,
            package_id: card.package_id,
            package_name: package.name.clone(),
            category: package.category.clone(),
            total_klipp: card.total_klipp,
            remaining_klipp: card.remaining_klipp,
            used_klipp: card.used_klipp(),
            progress_percentage: card.progress().value(),
            price_per_session: package.price_per_session(),
            purchase_date: card.purchase_date,
            expiry_date: card.expiry_date,
            days_until_expiry: billing::days_until(&card.expiry_date, now),
            is_expiring_soon: billing::is_expiring_soon(&card.expiry_date, now, expiry_warning_days),
            is_expired: card.is_expired(now),
            active: card.active,
        }
    }
}

/// Lists the caller's cards, newest purchase first.
pub struct GetKlippekortHandler {
    klippekort: Arc<dyn UserKlippekortRepository>,
    catalog: Arc<dyn KlippekortCatalog>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
    expiry_warning_days: i64,
}

impl GetKlippekortHandler {
    pub fn new(
        klippekort: Arc<dyn UserKlippekortRepository>,
        catalog: Arc<dyn KlippekortCatalog>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
        expiry_warning_days: i64,
    ) -> Self {
        Self {
            klippekort,
            catalog,
            clock,
            storage,
            expiry_warning_days,
        }
    }

    pub async fn handle(
        &self,
        query: GetKlippekortQuery,
    ) -> Result<Vec<KlippekortWithDetails>, KlippekortError> {
        let klippekort = &self.klippekort;
        let cards = self
            .storage
            .call("list_klippekort", || klippekort.list_for_user(&query.user_id))
            .await?;

        let now = self.clock.now();
        let catalog = &self.catalog;
        let mut packages: HashMap<KlippekortPackageId, KlippekortPackage> = HashMap::new();
        let mut details = Vec::with_capacity(cards.len());

        for card in &cards {
            if !packages.contains_key(&card.package_id) {
                let package = self
                    .storage
                    .call("find_package", || catalog.find(&card.package_id))
                    .await?
                    .ok_or(KlippekortError::PackageNotFound(card.package_id))?;
                packages.insert(card.package_id, package);
            }
            if let Some(package) = packages.get(&card.package_id) {
                details.push(KlippekortWithDetails::build(
                    card,
                    package,
                    &now,
                    self.expiry_warning_days,
                ));
            }
        }

        Ok(details)
    }
}
