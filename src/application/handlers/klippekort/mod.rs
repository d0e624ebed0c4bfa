//! Klippekort handlers.
//!
//! ## Commands
//! - Purchasing a card from a package
//! - Consuming sessions
//! - Staff balance adjustment
//! - Package catalog administration
//!
//! ## Queries
//! - The member's cards with derived progress and expiry fields
//! - Active packages with price per session

mod adjust_klippekort;
mod consume_klippekort;
mod get_klippekort;
mod manage_packages;
mod purchase_klippekort;
mod updater;

// Commands
pub use adjust_klippekort::{AdjustKlippekortCommand, AdjustKlippekortHandler};
pub use consume_klippekort::{
    ConsumeKlippekortCommand, ConsumeKlippekortHandler, ConsumeKlippekortResult,
};
pub use manage_packages::{CreateKlippekortPackageCommand, CreateKlippekortPackageHandler};
pub use purchase_klippekort::{
    PurchaseKlippekortCommand, PurchaseKlippekortHandler, PurchaseKlippekortResult,
};

// Queries
pub use get_klippekort::{GetKlippekortHandler, GetKlippekortQuery, KlippekortWithDetails};
pub use manage_packages::{KlippekortPackageOffer, ListKlippekortPackagesHandler};
