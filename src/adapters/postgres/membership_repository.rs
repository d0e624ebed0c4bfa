//! PostgreSQL implementation of UserMembershipRepository.
//!
//! Saves are a single conditional `UPDATE` on the version column, so two
//! writers racing on the same subscription cannot both succeed. The
//! one-current-subscription rule is enforced by the partial unique index
//! `user_memberships_one_current`.

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, Timestamp, UserId, UserMembershipId,
};
use crate::domain::membership::{MembershipStatus, UserMembership};
use crate::ports::UserMembershipRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt_row, db_error, is_constraint};

const ONE_CURRENT_INDEX: &str = "user_memberships_one_current";

/// PostgreSQL implementation of the UserMembershipRepository port.
pub struct PostgresUserMembershipRepository {
    pool: PgPool,
}

impl PostgresUserMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct UserMembershipRow {
    id: Uuid,
    user_id: String,
    membership_id: Uuid,
    status: String,
    start_date: DateTime<Utc>,
    renewal_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    binding_end: Option<DateTime<Utc>>,
    last_billed: Option<DateTime<Utc>>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserMembershipRow> for UserMembership {
    type Error = DomainError;

    fn try_from(row: UserMembershipRow) -> Result<Self, Self::Error> {
        let status: MembershipStatus = row
            .status
            .parse()
            .map_err(|e| corrupt_row("status", e))?;

        Ok(UserMembership {
            id: UserMembershipId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| corrupt_row("user_id", e))?,
            membership_id: MembershipId::from_uuid(row.membership_id),
            status,
            start_date: Timestamp::from_datetime(row.start_date),
            renewal_date: Timestamp::from_datetime(row.renewal_date),
            end_date: row.end_date.map(Timestamp::from_datetime),
            binding_end: row.binding_end.map(Timestamp::from_datetime),
            last_billed: row.last_billed.map(Timestamp::from_datetime),
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl UserMembershipRepository for PostgresUserMembershipRepository {
    async fn load_current(&self, user_id: &UserId) -> Result<Option<UserMembership>, DomainError> {
        let row: Option<UserMembershipRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, membership_id, status, start_date, renewal_date,
                   end_date, binding_end, last_billed, version, created_at, updated_at
            FROM user_memberships
            WHERE user_id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load membership", e))?;

        row.map(UserMembership::try_from).transpose()
    }

    async fn insert(&self, membership: &UserMembership) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_memberships (
                id, user_id, membership_id, status, start_date, renewal_date,
                end_date, binding_end, last_billed, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.user_id.as_str())
        .bind(membership.membership_id.as_uuid())
        .bind(membership.status.as_str())
        .bind(membership.start_date.as_datetime())
        .bind(membership.renewal_date.as_datetime())
        .bind(membership.end_date.as_ref().map(Timestamp::as_datetime))
        .bind(membership.binding_end.as_ref().map(Timestamp::as_datetime))
        .bind(membership.last_billed.as_ref().map(Timestamp::as_datetime))
        .bind(membership.version)
        .bind(membership.created_at.as_datetime())
        .bind(membership.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_constraint(&e, ONE_CURRENT_INDEX) {
                return DomainError::new(
                    ErrorCode::MembershipExists,
                    "User already has a membership",
                );
            }
            db_error("Failed to insert membership", e)
        })?;

        Ok(())
    }

    async fn save(&self, membership: &UserMembership, expected_version: i32) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_memberships SET
                membership_id = $3,
                status = $4,
                renewal_date = $5,
                end_date = $6,
                binding_end = $7,
                last_billed = $8,
                version = $9,
                updated_at = $10
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(expected_version)
        .bind(membership.membership_id.as_uuid())
        .bind(membership.status.as_str())
        .bind(membership.renewal_date.as_datetime())
        .bind(membership.end_date.as_ref().map(Timestamp::as_datetime))
        .bind(membership.binding_end.as_ref().map(Timestamp::as_datetime))
        .bind(membership.last_billed.as_ref().map(Timestamp::as_datetime))
        .bind(membership.version)
        .bind(membership.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save membership", e))?;

        if result.rows_affected() == 0 {
            let exists: Option<(i32,)> =
                sqlx::query_as("SELECT version FROM user_memberships WHERE id = $1")
                    .bind(membership.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| db_error("Failed to check membership version", e))?;

            return Err(match exists {
                Some(_) => DomainError::concurrent_modification("UserMembership"),
                None => DomainError::new(ErrorCode::MembershipNotFound, "Membership not found"),
            });
        }

        Ok(())
    }
}
