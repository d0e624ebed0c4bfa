//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `billing` - Pure date arithmetic over an injected "now"
//! - `membership` - Plan catalog, studio rules and subscription lifecycle
//! - `klippekort` - Punch-card packages and consumption ledger

pub mod billing;
pub mod foundation;
pub mod klippekort;
pub mod membership;
