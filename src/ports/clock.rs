//! Clock port.
//!
//! Handlers never read the system clock directly; they ask this port for
//! the current time in the studio's configured timezone.

use crate::domain::foundation::LocalTime;

/// Source of "now" in the application timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> LocalTime;
}
