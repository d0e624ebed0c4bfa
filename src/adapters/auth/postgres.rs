//! Session and admin lookups against the studio database.
//!
//! Sessions are issued by the login service, which shares the database.
//! This adapter only reads the `sessions` and `users` tables.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::adapters::postgres::{corrupt_row, db_error};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{AdminAuthorizer, SessionResolver};

pub struct PostgresSessions {
    pool: PgPool,
}

impl PostgresSessions {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionResolver for PostgresSessions {
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, DomainError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to resolve session", e))?;

        row.map(|(user_id,)| {
            UserId::new(user_id).map_err(|e| corrupt_row("user_id", e))
        })
        .transpose()
    }
}

#[async_trait]
impl AdminAuthorizer for PostgresSessions {
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let row: Option<(bool,)> = sqlx::query_as("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check admin flag", e))?;

        Ok(row.map(|(is_admin,)| is_admin).unwrap_or(false))
    }
}
