//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! Every port call goes through [`StoragePolicy`]; the studio rules are read
//! through the shared [`RuleConfiguration`].

pub mod authorization;
pub mod handlers;
mod rules_config;
mod storage;

pub use rules_config::RuleConfiguration;
pub use storage::{StoragePolicy, DEFAULT_MAX_CHANGE_ATTEMPTS, DEFAULT_STORAGE_TIMEOUT};
