//! PostgreSQL implementation of RulesRepository.
//!
//! The rules live in a single row with `id = 1`.

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::MembershipRules;
use crate::ports::RulesRepository;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;

pub struct PostgresRulesRepository {
    pool: PgPool,
}

impl PostgresRulesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RulesRow {
    allow_upgrades: bool,
    allow_downgrades: bool,
    combine_binding_periods: bool,
    allow_change_during_binding: bool,
    default_membership_id: Option<Uuid>,
}

impl From<RulesRow> for MembershipRules {
    fn from(row: RulesRow) -> Self {
        MembershipRules {
            allow_upgrades: row.allow_upgrades,
            allow_downgrades: row.allow_downgrades,
            combine_binding_periods: row.combine_binding_periods,
            allow_change_during_binding: row.allow_change_during_binding,
            default_membership_id: row.default_membership_id.map(MembershipId::from_uuid),
        }
    }
}

#[async_trait]
impl RulesRepository for PostgresRulesRepository {
    async fn load(&self) -> Result<Option<MembershipRules>, DomainError> {
        let row: Option<RulesRow> = sqlx::query_as(
            r#"
            SELECT allow_upgrades, allow_downgrades, combine_binding_periods,
                   allow_change_during_binding, default_membership_id
            FROM membership_rules
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load membership rules", e))?;

        Ok(row.map(MembershipRules::from))
    }

    async fn save(&self, rules: &MembershipRules) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO membership_rules (
                id, allow_upgrades, allow_downgrades, combine_binding_periods,
                allow_change_during_binding, default_membership_id, updated_at
            ) VALUES (1, $1, $2, $3, $4, $5, NOW())
            ON CONFLICT (id) DO UPDATE SET
                allow_upgrades = EXCLUDED.allow_upgrades,
                allow_downgrades = EXCLUDED.allow_downgrades,
                combine_binding_periods = EXCLUDED.combine_binding_periods,
                allow_change_during_binding = EXCLUDED.allow_change_during_binding,
                default_membership_id = EXCLUDED.default_membership_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(rules.allow_upgrades)
        .bind(rules.allow_downgrades)
        .bind(rules.combine_binding_periods)
        .bind(rules.allow_change_during_binding)
        .bind(rules.default_membership_id.as_ref().map(MembershipId::as_uuid))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save membership rules", e))?;

        Ok(())
    }
}
