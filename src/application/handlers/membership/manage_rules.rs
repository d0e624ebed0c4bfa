//! Rule administration handlers.

use std::sync::Arc;

use crate::application::authorization::require_admin;
use crate::application::{RuleConfiguration, StoragePolicy};
use crate::domain::foundation::UserId;
use crate::domain::membership::{MembershipError, MembershipRules};
use crate::ports::{AdminAuthorizer, MembershipCatalog};

/// Query for the studio rules.
#[derive(Debug, Clone)]
pub struct GetRulesQuery {
    pub actor: UserId,
}

pub struct GetRulesHandler {
    rules: Arc<RuleConfiguration>,
    authorizer: Arc<dyn AdminAuthorizer>,
    storage: StoragePolicy,
}

impl GetRulesHandler {
    pub fn new(
        rules: Arc<RuleConfiguration>,
        authorizer: Arc<dyn AdminAuthorizer>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            rules,
            authorizer,
            storage,
        }
    }

    pub async fn handle(&self, query: GetRulesQuery) -> Result<MembershipRules, MembershipError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &query.actor).await?;
        Ok(self.rules.current().await?)
    }
}

/// Command replacing the studio rules wholesale.
#[derive(Debug, Clone)]
pub struct UpdateRulesCommand {
    pub actor: UserId,
    pub rules: MembershipRules,
}

/// Handler for rule updates.
///
/// A configured default plan must exist in the catalog.
pub struct UpdateRulesHandler {
    rules: Arc<RuleConfiguration>,
    catalog: Arc<dyn MembershipCatalog>,
    authorizer: Arc<dyn AdminAuthorizer>,
    storage: StoragePolicy,
}

impl UpdateRulesHandler {
    pub fn new(
        rules: Arc<RuleConfiguration>,
        catalog: Arc<dyn MembershipCatalog>,
        authorizer: Arc<dyn AdminAuthorizer>,
        storage: StoragePolicy,
    ) -> Self {
        Self {
            rules,
            catalog,
            authorizer,
            storage,
        }
    }

    pub async fn handle(&self, cmd: UpdateRulesCommand) -> Result<MembershipRules, MembershipError> {
        require_admin(self.authorizer.as_ref(), &self.storage, &cmd.actor).await?;

        if let Some(default_id) = cmd.rules.default_membership_id {
            let catalog = &self.catalog;
            if self
                .storage
                .call("find_plan", || catalog.find(&default_id))
                .await?
                .is_none()
            {
                return Err(MembershipError::validation(
                    "default_membership_id",
                    format!("membership plan {} does not exist", default_id),
                ));
            }
        }

        self.rules.update(cmd.rules.clone()).await?;
        tracing::info!(actor = %cmd.actor, rules = ?cmd.rules, "membership rules updated");
        Ok(cmd.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Fixture, ADMIN};
    use crate::domain::foundation::MembershipId;
    use crate::ports::RulesRepository as _;

    fn update_handler(f: &Fixture) -> UpdateRulesHandler {
        UpdateRulesHandler::new(f.rules.clone(), f.plans.clone(), f.auth.clone(), f.storage)
    }

    fn get_handler(f: &Fixture) -> GetRulesHandler {
        GetRulesHandler::new(f.rules.clone(), f.auth.clone(), f.storage)
    }

    #[tokio::test]
    async fn admin_reads_defaults() {
        let f = Fixture::new();
        let rules = get_handler(&f)
            .handle(GetRulesQuery { actor: user(ADMIN) })
            .await
            .unwrap();
        assert_eq!(rules, MembershipRules::default());
    }

    #[tokio::test]
    async fn member_cannot_read_rules() {
        let f = Fixture::new();
        let err = get_handler(&f)
            .handle(GetRulesQuery { actor: user("m1") })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::Forbidden);
    }

    #[tokio::test]
    async fn update_persists_and_is_visible() {
        let f = Fixture::new();
        let plan = f.plan("Intro", 0, 0).await;
        let rules = MembershipRules {
            allow_downgrades: true,
            default_membership_id: Some(plan.id),
            ..MembershipRules::default()
        };

        update_handler(&f)
            .handle(UpdateRulesCommand {
                actor: user(ADMIN),
                rules: rules.clone(),
            })
            .await
            .unwrap();

        assert_eq!(f.rules.current().await.unwrap(), rules);
        assert_eq!(f.rules_repo.load().await.unwrap(), Some(rules));
    }

    #[tokio::test]
    async fn unknown_default_plan_is_rejected() {
        let f = Fixture::new();
        let err = update_handler(&f)
            .handle(UpdateRulesCommand {
                actor: user(ADMIN),
                rules: MembershipRules {
                    default_membership_id: Some(MembershipId::new()),
                    ..MembershipRules::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::ValidationFailed { ref field, .. } if field == "default_membership_id"));
        assert_eq!(f.rules.current().await.unwrap(), MembershipRules::default());
    }

    #[tokio::test]
    async fn member_cannot_update_rules() {
        let f = Fixture::new();
        let err = update_handler(&f)
            .handle(UpdateRulesCommand {
                actor: user("m1"),
                rules: MembershipRules::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, MembershipError::Forbidden);
    }
}
