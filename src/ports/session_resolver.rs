//! Current-user lookup port.
//!
//! Session storage is owned by an external collaborator. The HTTP layer
//! extracts an opaque token (Bearer header or `session` cookie) and asks
//! this port who it belongs to.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Resolves an opaque session token to the signed-in user.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Returns `None` for unknown or expired sessions.
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, DomainError>;
}
