//! PostgreSQL implementation of UserKlippekortRepository.

use crate::domain::foundation::{
    DomainError, ErrorCode, KlippekortPackageId, Timestamp, UserId, UserKlippekortId,
};
use crate::domain::klippekort::UserKlippekort;
use crate::ports::UserKlippekortRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt_row, db_error, from_db_count, to_db_count};

pub struct PostgresUserKlippekortRepository {
    pool: PgPool,
}

impl PostgresUserKlippekortRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserKlippekortRow {
    id: Uuid,
    user_id: String,
    package_id: Uuid,
    total_klipp: i32,
    remaining_klipp: i32,
    purchase_date: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
    active: bool,
    version: i32,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserKlippekortRow> for UserKlippekort {
    type Error = DomainError;

    fn try_from(row: UserKlippekortRow) -> Result<Self, Self::Error> {
        Ok(UserKlippekort {
            id: UserKlippekortId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| corrupt_row("user_id", e))?,
            package_id: KlippekortPackageId::from_uuid(row.package_id),
            total_klipp: from_db_count("total_klipp", row.total_klipp)?,
            remaining_klipp: from_db_count("remaining_klipp", row.remaining_klipp)?,
            purchase_date: Timestamp::from_datetime(row.purchase_date),
            expiry_date: Timestamp::from_datetime(row.expiry_date),
            active: row.active,
            version: row.version,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, package_id, total_klipp, remaining_klipp,
           purchase_date, expiry_date, active, version, updated_at
    FROM user_klippekort
"#;

#[async_trait]
impl UserKlippekortRepository for PostgresUserKlippekortRepository {
    async fn load(&self, id: &UserKlippekortId) -> Result<Option<UserKlippekort>, DomainError> {
        let row: Option<UserKlippekortRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to load klippekort", e))?;

        row.map(UserKlippekort::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<UserKlippekort>, DomainError> {
        let rows: Vec<UserKlippekortRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 ORDER BY purchase_date DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list klippekort", e))?;

        rows.into_iter().map(UserKlippekort::try_from).collect()
    }

    async fn insert(&self, klippekort: &UserKlippekort) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_klippekort (
                id, user_id, package_id, total_klipp, remaining_klipp,
                purchase_date, expiry_date, active, version, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(klippekort.id.as_uuid())
        .bind(klippekort.user_id.as_str())
        .bind(klippekort.package_id.as_uuid())
        .bind(to_db_count("total_klipp", klippekort.total_klipp)?)
        .bind(to_db_count("remaining_klipp", klippekort.remaining_klipp)?)
        .bind(klippekort.purchase_date.as_datetime())
        .bind(klippekort.expiry_date.as_datetime())
        .bind(klippekort.active)
        .bind(klippekort.version)
        .bind(klippekort.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert klippekort", e))?;

        Ok(())
    }

    async fn save(&self, klippekort: &UserKlippekort, expected_version: i32) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_klippekort SET
                remaining_klipp = $3,
                active = $4,
                version = $5,
                updated_at = $6
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(klippekort.id.as_uuid())
        .bind(expected_version)
        .bind(to_db_count("remaining_klipp", klippekort.remaining_klipp)?)
        .bind(klippekort.active)
        .bind(klippekort.version)
        .bind(klippekort.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save klippekort", e))?;

        if result.rows_affected() == 0 {
            let exists: Option<(i32,)> =
                sqlx::query_as("SELECT version FROM user_klippekort WHERE id = $1")
                    .bind(klippekort.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| db_error("Failed to check klippekort version", e))?;

            return Err(match exists {
                Some(_) => DomainError::concurrent_modification("UserKlippekort"),
                None => DomainError::new(ErrorCode::KlippekortNotFound, "Klippekort not found"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_balance_in_row_is_rejected() {
        let now = Utc::now();
        let row = UserKlippekortRow {
            id: Uuid::new_v4(),
            user_id: "u-1".to_string(),
            package_id: Uuid::new_v4(),
            total_klipp: 10,
            remaining_klipp: -2,
            purchase_date: now,
            expiry_date: now,
            active: true,
            version: 0,
            updated_at: now,
        };
        let err = UserKlippekort::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
