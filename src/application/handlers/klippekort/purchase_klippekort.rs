//! PurchaseKlippekortHandler - Command handler for issuing punch cards.
//!
//! Payment happens elsewhere; this records the card once it is paid for.

use std::sync::Arc;

use crate::application::authorization::require_self_or_admin;
use crate::application::StoragePolicy;
use crate::domain::foundation::{KlippekortPackageId, UserId};
use crate::domain::klippekort::{KlippekortError, KlippekortPackage, UserKlippekort};
use crate::ports::{AdminAuthorizer, Clock, KlippekortCatalog, UserKlippekortRepository};

#[derive(Debug, Clone)]
pub struct PurchaseKlippekortCommand {
    pub actor: UserId,
    pub user_id: UserId,
    pub package_id: KlippekortPackageId,
}

#[derive(Debug, Clone)]
pub struct PurchaseKlippekortResult {
    pub klippekort: UserKlippekort,
    pub package: KlippekortPackage,
}

pub struct PurchaseKlippekortHandler {
    klippekort: Arc<dyn UserKlippekortRepository>,
    catalog: Arc<dyn KlippekortCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl PurchaseKlippekortHandler {
    pub fn new(
        klippekort: Arc<dyn UserKlippekortRepository>,
        catalog: Arc<dyn KlippekortCatalog>,
        authorizer: Arc<dyn AdminAuthorizer>,
        clock: Arc<dyn Clock>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            klippekort,
            catalog,
            authorizer,
            clock,
            storage,
        }
    }

    pub async fn handle(
        &self,
        cmd: PurchaseKlippekortCommand,
    ) -> Result<PurchaseKlippekortResult, KlippekortError> {
        require_self_or_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor, &cmd.user_id)
            .await?;

        let catalog = &self.catalog;
        let package = self
            .storage
            .call("find_package", || catalog.find(&cmd.package_id))
            .await?
            .ok_or(KlippekortError::PackageNotFound(cmd.package_id))?;

        let card = UserKlippekort::purchase(cmd.user_id.clone(), &package, &self.clock.now())?;
        let klippekort = &self.klippekort;
        self.storage
            .write("insert_klippekort", || klippekort.insert(&card))
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            klippekort_id = %card.id,
            package_id = %package.id,
            klipp = card.total_klipp,
            "klippekort purchased"
        );

        Ok(PurchaseKlippekortResult {
            klippekort: card,
            package,
        })
    }
}
