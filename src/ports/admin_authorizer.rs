//! Administrator capability port.
//!
//! Every administrative handler asks this port before acting. Denial is
//! reported as `Forbidden`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Decides whether a user may perform staff operations.
#[async_trait]
pub trait AdminAuthorizer: Send + Sync {
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, DomainError>;
}
