//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod klippekort;
pub mod membership;

#[cfg(test)]
pub(crate) mod test_support;
