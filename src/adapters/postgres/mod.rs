//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresUserMembershipRepository` - Subscriptions with version-checked saves
//! - `PostgresUserKlippekortRepository` - Punch cards with version-checked saves
//! - `PostgresMembershipCatalog` / `PostgresKlippekortCatalog` - Plan and package catalogs
//! - `PostgresRulesRepository` - The single studio rules row
//!
//! Connection-level failures surface as `DatabaseError`, which the storage
//! policy treats as transient. Query, constraint and decode failures, and rows
//! that do not form a valid entity, surface as `InternalError` and are never
//! retried.

mod catalog;
mod klippekort_repository;
mod membership_repository;
mod rules_repository;

pub use catalog::{PostgresKlippekortCatalog, PostgresMembershipCatalog};
pub use klippekort_repository::PostgresUserKlippekortRepository;
pub use membership_repository::PostgresUserMembershipRepository;
pub use rules_repository::PostgresRulesRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    let message = format!("{}: {}", context, e);
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DomainError::database(message),
        _ => DomainError::new(ErrorCode::InternalError, message),
    }
}

/// A stored row that does not form a valid entity.
pub(crate) fn corrupt_row(field: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Invalid {} in database: {}", field, detail),
    )
}

fn is_constraint(e: &sqlx::Error, name: &str) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.constraint() == Some(name))
}

/// Counts are `u32` in the domain and `INTEGER` in the schema.
fn to_db_count(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::validation(field, format!("{} is too large to store", value))
    })
}

fn from_db_count(field: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt_row(field, value))
}
