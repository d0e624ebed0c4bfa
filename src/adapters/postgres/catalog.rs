//! PostgreSQL catalogs for membership plans and klippekort packages.

use crate::domain::foundation::{DomainError, ErrorCode, KlippekortPackageId, MembershipId, Timestamp};
use crate::domain::klippekort::KlippekortPackage;
use crate::domain::membership::Membership;
use crate::ports::{KlippekortCatalog, MembershipCatalog};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, from_db_count, to_db_count};

// ════════════════════════════════════════════════════════════════════════════
// Membership plans
// ════════════════════════════════════════════════════════════════════════════

pub struct PostgresMembershipCatalog {
    pool: PgPool,
}

impl PostgresMembershipCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: Uuid,
    name: String,
    price: i64,
    commitment_months: i32,
    student_senior_eligible: bool,
    special_offer: bool,
    description: String,
    features: Vec<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: MembershipId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            commitment_months: from_db_count("commitment_months", row.commitment_months)?,
            student_senior_eligible: row.student_senior_eligible,
            special_offer: row.special_offer,
            description: row.description,
            features: row.features,
            active: row.active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl MembershipCatalog for PostgresMembershipCatalog {
    async fn find(&self, id: &MembershipId) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, commitment_months, student_senior_eligible,
                   special_offer, description, features, active, created_at
            FROM memberships
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find membership plan", e))?;

        row.map(Membership::try_from).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, commitment_months, student_senior_eligible,
                   special_offer, description, features, active, created_at
            FROM memberships
            WHERE active OR NOT $1
            ORDER BY price ASC, name ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list membership plans", e))?;

        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn insert(&self, plan: &Membership) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (
                id, name, price, commitment_months, student_senior_eligible,
                special_offer, description, features, active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.price)
        .bind(to_db_count("commitment_months", plan.commitment_months)?)
        .bind(plan.student_senior_eligible)
        .bind(plan.special_offer)
        .bind(&plan.description)
        .bind(&plan.features)
        .bind(plan.active)
        .bind(plan.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert membership plan", e))?;

        Ok(())
    }

    async fn update(&self, plan: &Membership) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE memberships SET price = $2, active = $3 WHERE id = $1")
            .bind(plan.id.as_uuid())
            .bind(plan.price)
            .bind(plan.active)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update membership plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MembershipPlanNotFound,
                format!("Membership plan {} not found", plan.id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Klippekort packages
// ════════════════════════════════════════════════════════════════════════════

pub struct PostgresKlippekortCatalog {
    pool: PgPool,
}

impl PostgresKlippekortCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    name: String,
    category: String,
    klipp_count: i32,
    price: i64,
    validity_days: i32,
    active: bool,
    popular: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PackageRow> for KlippekortPackage {
    type Error = DomainError;

    fn try_from(row: PackageRow) -> Result<Self, Self::Error> {
        Ok(KlippekortPackage {
            id: KlippekortPackageId::from_uuid(row.id),
            name: row.name,
            category: row.category,
            klipp_count: from_db_count("klipp_count", row.klipp_count)?,
            price: row.price,
            validity_days: from_db_count("validity_days", row.validity_days)?,
            active: row.active,
            popular: row.popular,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl KlippekortCatalog for PostgresKlippekortCatalog {
    async fn find(&self, id: &KlippekortPackageId) -> Result<Option<KlippekortPackage>, DomainError> {
        let row: Option<PackageRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, klipp_count, price, validity_days, active, popular, created_at
            FROM klippekort_packages
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find klippekort package", e))?;

        row.map(KlippekortPackage::try_from).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<KlippekortPackage>, DomainError> {
        let rows: Vec<PackageRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, klipp_count, price, validity_days, active, popular, created_at
            FROM klippekort_packages
            WHERE active OR NOT $1
            ORDER BY price ASC, name ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list klippekort packages", e))?;

        rows.into_iter().map(KlippekortPackage::try_from).collect()
    }

    async fn insert(&self, package: &KlippekortPackage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO klippekort_packages (
                id, name, category, klipp_count, price, validity_days, active, popular, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(package.id.as_uuid())
        .bind(&package.name)
        .bind(&package.category)
        .bind(to_db_count("klipp_count", package.klipp_count)?)
        .bind(package.price)
        .bind(to_db_count("validity_days", package.validity_days)?)
        .bind(package.active)
        .bind(package.popular)
        .bind(package.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert klippekort package", e))?;

        Ok(())
    }
}
