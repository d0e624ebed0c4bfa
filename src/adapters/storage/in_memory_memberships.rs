//! In-Memory UserMembership Repository
//!
//! Keeps subscriptions in a map guarded by a tokio `RwLock`. The
//! compare-and-swap check and the write happen under one write guard, which
//! gives the same serialization as the Postgres adapter's conditional update.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, UserMembershipId};
use crate::domain::membership::{MembershipStatus, UserMembership};
use crate::ports::UserMembershipRepository;

/// In-memory storage for subscriptions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserMembershipRepository {
    rows: Arc<RwLock<HashMap<UserMembershipId, UserMembership>>>,
    failures: Arc<AtomicU32>,
}

impl InMemoryUserMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls fail with a transient `DatabaseError`.
    pub fn inject_failures(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Every stored row, cancelled history included.
    pub async fn all(&self) -> Vec<UserMembership> {
        self.rows.read().await.values().cloned().collect()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::database("injected storage failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserMembershipRepository for InMemoryUserMembershipRepository {
    async fn load_current(&self, user_id: &UserId) -> Result<Option<UserMembership>, DomainError> {
        self.check_failure()?;
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|m| &m.user_id == user_id && m.status != MembershipStatus::Cancelled)
            .cloned())
    }

    async fn insert(&self, membership: &UserMembership) -> Result<(), DomainError> {
        self.check_failure()?;
        let mut rows = self.rows.write().await;
        let has_current = rows.values().any(|m| {
            m.user_id == membership.user_id && m.status != MembershipStatus::Cancelled
        });
        if has_current && membership.status != MembershipStatus::Cancelled {
            return Err(DomainError::new(
                ErrorCode::MembershipExists,
                format!("user {} already has a membership", membership.user_id),
            ));
        }
        rows.insert(membership.id, membership.clone());
        Ok(())
    }

    async fn save(
        &self,
        membership: &UserMembership,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        self.check_failure()?;
        let mut rows = self.rows.write().await;
        let stored = rows.get_mut(&membership.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::MembershipNotFound,
                format!("membership {} not found", membership.id),
            )
        })?;
        if stored.version != expected_version {
            return Err(DomainError::concurrent_modification("UserMembership"));
        }
        *stored = membership.clone();
        Ok(())
    }
}
