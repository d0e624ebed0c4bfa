//! Klippekort domain module.
//!
//! Punch-card packages and the per-user consumption ledger.

mod errors;
mod ledger;
mod package;

pub use errors::KlippekortError;
pub use ledger::{progress_percentage, UserKlippekort};
pub use package::{price_per_session, KlippekortPackage, NewKlippekortPackage};
