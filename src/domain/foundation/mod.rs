//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the studio membership domain.

mod errors;
mod ids;
mod ownership;
mod percentage;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{KlippekortPackageId, MembershipId, UserId, UserKlippekortId, UserMembershipId};
pub use ownership::OwnedByUser;
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::{LocalTime, Timestamp};
