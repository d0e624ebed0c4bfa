//! In-Memory Rules Repository

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::membership::MembershipRules;
use crate::ports::RulesRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryRulesRepository {
    rules: Arc<RwLock<Option<MembershipRules>>>,
}

impl InMemoryRulesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `rules` already stored.
    pub fn with_rules(rules: MembershipRules) -> Self {
        Self {
            rules: Arc::new(RwLock::new(Some(rules))),
        }
    }
}

#[async_trait]
impl RulesRepository for InMemoryRulesRepository {
    async fn load(&self) -> Result<Option<MembershipRules>, DomainError> {
        Ok(self.rules.read().await.clone())
    }

    async fn save(&self, rules: &MembershipRules) -> Result<(), DomainError> {
        *self.rules.write().await = Some(rules.clone());
        Ok(())
    }
}
