//! In-Memory UserKlippekort Repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId, UserKlippekortId};
use crate::domain::klippekort::UserKlippekort;
use crate::ports::UserKlippekortRepository;

/// In-memory storage for punch cards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserKlippekortRepository {
    rows: Arc<RwLock<HashMap<UserKlippekortId, UserKlippekort>>>,
}

impl InMemoryUserKlippekortRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserKlippekortRepository for InMemoryUserKlippekortRepository {
    async fn load(&self, id: &UserKlippekortId) -> Result<Option<UserKlippekort>, DomainError> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserKlippekort>, DomainError> {
        let rows = self.rows.read().await;
        let mut cards: Vec<UserKlippekort> = rows
            .values()
            .filter(|k| &k.user_id == user_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(cards)
    }

    async fn insert(&self, klippekort: &UserKlippekort) -> Result<(), DomainError> {
        self.rows
            .write()
            .await
            .insert(klippekort.id, klippekort.clone());
        Ok(())
    }

    async fn save(
        &self,
        klippekort: &UserKlippekort,
        expected_version: i32,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let stored = rows.get_mut(&klippekort.id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::KlippekortNotFound,
                format!("klippekort {} not found", klippekort.id),
            )
        })?;
        if stored.version != expected_version {
            return Err(DomainError::concurrent_modification("UserKlippekort"));
        }
        *stored = klippekort.clone();
        Ok(())
    }
}
