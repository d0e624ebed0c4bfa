//! Studio rules persistence port.

use crate::domain::foundation::DomainError;
use crate::domain::membership::MembershipRules;
use async_trait::async_trait;

/// Stores the single studio-wide [`MembershipRules`] record.
#[async_trait]
pub trait RulesRepository: Send + Sync {
    /// Returns `None` when the studio has never saved its rules.
    async fn load(&self) -> Result<Option<MembershipRules>, DomainError>;

    async fn save(&self, rules: &MembershipRules) -> Result<(), DomainError>;
}
