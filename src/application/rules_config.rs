//! Studio rule configuration.
//!
//! One instance is constructed at startup and shared by reference with
//! every handler that needs the rules. The record is loaded on first use
//! and cached; updates write through and become visible to all readers at
//! once.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::StoragePolicy;
use crate::domain::foundation::DomainError;
use crate::domain::membership::MembershipRules;
use crate::ports::RulesRepository;

/// Cached, lock-guarded view of the studio's [`MembershipRules`].
pub struct RuleConfiguration {
    repository: Arc<dyn RulesRepository>,
    storage: StoragePolicy,
    cached: RwLock<Option<MembershipRules>>,
}

impl RuleConfiguration {
    pub fn new(repository: Arc<dyn RulesRepository>, storage: StoragePolicy) -> Self {
        Self {
            repository,
            storage,
            cached: RwLock::new(None),
        }
    }

    /// Current rules, loading them on first access.
    ///
    /// Falls back to [`MembershipRules::default`] when nothing is stored.
    pub async fn current(&self) -> Result<MembershipRules, DomainError> {
        if let Some(rules) = self.cached.read().await.as_ref() {
            return Ok(rules.clone());
        }

        let mut cached = self.cached.write().await;
        if let Some(rules) = cached.as_ref() {
            return Ok(rules.clone());
        }

        let repository = &self.repository;
        let loaded = self
            .storage
            .call("load_rules", || repository.load())
            .await?
            .unwrap_or_default();
        tracing::debug!(?loaded, "membership rules loaded");

        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Persists `rules` and replaces the cached copy.
    ///
    /// Readers block for the duration of the write, so no one observes the
    /// old cache after the new rules are stored.
    pub async fn update(&self, rules: MembershipRules) -> Result<(), DomainError> {
        let mut cached = self.cached.write().await;
        let repository = &self.repository;
        self.storage
            .call("save_rules", || repository.save(&rules))
            .await?;
        *cached = Some(rules);
        Ok(())
    }
}
