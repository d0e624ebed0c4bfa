//! Klippekort package catalog handlers.

use std::sync::Arc;

use serde::Serialize;

use crate::application::authorization::require_admin;
use crate::application::StoragePolicy;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::klippekort::{KlippekortError, KlippekortPackage, NewKlippekortPackage};
use crate::ports::{AdminAuthorizer, Clock, KlippekortCatalog};

#[derive(Debug, Clone)]
pub struct CreateKlippekortPackageCommand {
    pub actor: UserId,
    pub package: NewKlippekortPackage,
}

pub struct CreateKlippekortPackageHandler {
    catalog: Arc<dyn KlippekortCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    clock: Arc<dyn Clock>,
    storage: StoragePolicy,
}

impl CreateKlippekortPackageHandler {
    pub fn new(
        catalog: Arc<dyn KlippekortCatalog>,
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
        cmd: CreateKlippekortPackageCommand,
    ) -> Result<KlippekortPackage, KlippekortError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        let package =
            KlippekortPackage::create(cmd.package, Timestamp::from_datetime(self.clock.now()))?;
        let catalog = &self.catalog;
        self.storage
            .write("insert_package", || catalog.insert(&package))
            .await?;

        tracing::info!(
            package_id = %package.id,
            name = %package.name,
            klipp = package.klipp_count,
            "klippekort package created"
        );
        Ok(package)
    }
}

/// A package as offered to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlippekortPackageOffer {
    #[serde(flatten)]
    pub package: KlippekortPackage,
    pub price_per_session: i64,
}

/// Lists active packages, cheapest first.
pub struct ListKlippekortPackagesHandler {
    catalog: Arc<dyn KlippekortCatalog>,
    storage: StoragePolicy,
}

impl ListKlippekortPackagesHandler {
    pub fn new(catalog: Arc<dyn KlippekortCatalog>, storage: StoragePolicy) -> Self {
        Self { catalog, storage }
    }

    pub async fn handle(&self) -> Result<Vec<KlippekortPackageOffer>, KlippekortError> {
        let catalog = &self.catalog;
        let packages = self
            .storage
            .call("list_packages", || catalog.list(true))
            .await?;

        Ok(packages
            .into_iter()
            .map(|package| KlippekortPackageOffer {
                price_per_session: package.price_per_session(),
                package,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture, ADMIN};

    fn new_package(klipp_count: u32) -> NewKlippekortPackage {
        NewKlippekortPackage {
            name: "Yoga 10".to_string(),
            category: "yoga".to_string(),
            klipp_count,
            price: 89900,
            validity_days: 180,
            popular: true,
        }
    }

    fn create_handler(f: &Fixture) -> CreateKlippekortPackageHandler {
        CreateKlippekortPackageHandler::new(
            f.packages.clone(),
            f.auth.clone(),
            f.clock.clone(),
            f.storage,
        )
    }

    #[tokio::test]
    async fn admin_creates_package() {
        let f = Fixture::new();
        let package = create_handler(&f)
            .handle(CreateKlippekortPackageCommand {
                actor: user(ADMIN),
                package: new_package(10),
            })
            .await
            .unwrap();

        assert!(package.active);
        assert_eq!(f.packages.find(&package.id).await.unwrap(), Some(package));
    }

    #[tokio::test]
    async fn empty_package_is_rejected() {
        let f = Fixture::new();
        let err = create_handler(&f)
            .handle(CreateKlippekortPackageCommand {
                actor: user(ADMIN),
                package: new_package(0),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, KlippekortError::ValidationFailed { ref field, .. } if field == "klipp_count"));
    }

    #[tokio::test]
    async fn member_cannot_create_packages() {
        let f = Fixture::new();
        let err = create_handler(&f)
            .handle(CreateKlippekortPackageCommand {
                actor: user("m1"),
                package: new_package(10),
            })
            .await
            .unwrap_err();
        assert_eq!(err, KlippekortError::Forbidden);
    }

    #[tokio::test]
    async fn listing_hides_inactive_and_adds_unit_price() {
        let f = Fixture::new();
        let ten = f.package(10, 89900, 180).await;
        let mut retired = f.package(5, 49900, 90).await;
        retired.active = false;
        f.packages.insert(&retired).await.unwrap();

        let offers = ListKlippekortPackagesHandler::new(f.packages.clone(), f.storage)
            .handle()
            .await
            .unwrap();

        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].package, ten);
        assert_eq!(offers[0].price_per_session, 8990);
    }
}
