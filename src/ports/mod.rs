//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UserMembershipRepository` - Subscriptions with compare-and-swap saves
//! - `UserKlippekortRepository` - Punch cards with compare-and-swap saves
//! - `MembershipCatalog` / `KlippekortCatalog` - Shared catalog data
//! - `RulesRepository` - Studio-wide membership rules
//!
//! ## Collaborator Ports
//!
//! - `Clock` - Current time in the studio timezone
//! - `SessionResolver` - Current-user lookup
//! - `AdminAuthorizer` - Staff capability check

mod admin_authorizer;
mod catalog;
mod clock;
mod klippekort_repository;
mod rules_repository;
mod session_resolver;
mod user_membership_repository;

pub use admin_authorizer::AdminAuthorizer;
pub use catalog::{KlippekortCatalog, MembershipCatalog};
pub use clock::Clock;
pub use klippekort_repository::UserKlippekortRepository;
pub use rules_repository::RulesRepository;
pub use session_resolver::SessionResolver;
pub use user_membership_repository::UserMembershipRepository;
