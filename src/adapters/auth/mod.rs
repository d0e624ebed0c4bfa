//! Authentication adapters.
//!
//! Implementations of the `SessionResolver` and `AdminAuthorizer` ports:
//!
//! - `mock` - In-memory sessions for tests and local runs
//! - `postgres` - Lookups against the `sessions` and `users` tables

mod mock;
mod postgres;

pub use mock::InMemorySessions;
pub use postgres::PostgresSessions;
