//! Account lookups backing the guards.
//!
//! The guards only read accounts by primary key. `update_display_name` exists for
//! the profile endpoint and is not used by identity resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use thiserror::Error;
use tracing::{Instrument, info_span};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Key lookup over persisted accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by id; `Ok(None)` when no record exists.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be queried.
    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Set the display name; `Ok(None)` when no record exists.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be updated.
    async fn update_display_name(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> Result<Option<Account>, StoreError>;
}

/// Postgres-backed store reading the `accounts` table.
#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, email, display_name, created_at::text AS created_at
            FROM accounts
            WHERE id = $1
        ";
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn update_display_name(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> Result<Option<Account>, StoreError> {
        let query = r"
            UPDATE accounts
            SET display_name = $2
            WHERE id = $1
            RETURNING id, email, display_name, created_at::text AS created_at
        ";
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "UPDATE");
        let row = sqlx::query(query)
            .bind(id)
            .bind(display_name)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(account_from_row).transpose()?)
    }
}
