//! Storage Adapters
//!
//! In-memory implementations of the storage ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryUserMembershipRepository** - Subscriptions with compare-and-swap saves
//! - **InMemoryUserKlippekortRepository** - Punch cards with compare-and-swap saves
//! - **InMemoryMembershipCatalog** / **InMemoryKlippekortCatalog** - Catalog data
//! - **InMemoryRulesRepository** - Studio rules
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryUserMembershipRepository;
//!
//! // Testing: in-memory storage
//! let memberships = Arc::new(InMemoryUserMembershipRepository::new());
//! ```

mod in_memory_catalog;
mod in_memory_klippekort;
mod in_memory_memberships;
mod in_memory_rules;

pub use in_memory_catalog::{InMemoryKlippekortCatalog, InMemoryMembershipCatalog};
pub use in_memory_klippekort::InMemoryUserKlippekortRepository;
pub use in_memory_memberships::InMemoryUserMembershipRepository;
pub use in_memory_rules::InMemoryRulesRepository;
