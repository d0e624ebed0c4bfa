//! In-memory session and admin adapters.
//!
//! These adapters implement the `SessionResolver` and `AdminAuthorizer`
//! ports without an external session store. Used by tests and by local
//! development runs.
//!
//! # Example
//!
//! ```ignore
//! use studio_membership::adapters::auth::InMemorySessions;
//!
//! let sessions = InMemorySessions::new()
//!     .with_session("member-token", "member-1")
//!     .with_session("staff-token", "staff-1")
//!     .with_admin("staff-1");
//!
//! let user = sessions.resolve("member-token").await?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{AdminAuthorizer, SessionResolver};

/// Token-to-user map plus the set of staff accounts.
#[derive(Debug, Default)]
pub struct InMemorySessions {
    sessions: RwLock<HashMap<String, UserId>>,
    admins: RwLock<HashSet<UserId>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session token for a user.
    ///
    /// Blank user ids are ignored.
    pub fn with_session(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        if let Ok(user_id) = UserId::new(user_id) {
            self.sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(token.into(), user_id);
        }
        self
    }

    /// Grants administrator capability.
    pub fn with_admin(self, user_id: impl Into<String>) -> Self {
        if let Ok(user_id) = UserId::new(user_id) {
            self.admins
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(user_id);
        }
        self
    }

    /// Ends a session.
    pub fn revoke(&self, token: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionResolver for InMemorySessions {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, DomainError> {
        Ok(self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned())
    }
}

#[async_trait]
impl AdminAuthorizer for InMemorySessions {
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self
            .admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_tokens_only() {
        let sessions = InMemorySessions::new().with_session("t1", "member-1");

        assert_eq!(
            sessions.resolve("t1").await.unwrap(),
            Some(UserId::new("member-1").unwrap())
        );
        assert_eq!(sessions.resolve("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn revoked_session_no_longer_resolves() {
        let sessions = InMemorySessions::new().with_session("t1", "member-1");
        sessions.revoke("t1");
        assert_eq!(sessions.resolve("t1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn admin_flag_is_per_user() {
        let sessions = InMemorySessions::new().with_admin("staff-1");

        assert!(sessions.is_admin(&UserId::new("staff-1").unwrap()).await.unwrap());
        assert!(!sessions.is_admin(&UserId::new("member-1").unwrap()).await.unwrap());
    }
}
