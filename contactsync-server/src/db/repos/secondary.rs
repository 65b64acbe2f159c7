//! Secondary store adapter - `contact_replicas` table (Postgres)
//!
//! This service owns the table. It is created on demand before the first
//! write, not at startup, so the bridge serves requests while the secondary
//! is down. Deletes here are physical.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::SecondaryStore;
use crate::db::{bounded, StoreError};
use crate::models::{ContactFields, ContactId};

const TABLE: &str = "contact_replicas";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contact_replicas (
    id UUID PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone_work TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Secondary store repository
pub struct SecondaryRepo {
    pool: PgPool,
    timeout: Duration,
    /// Set once the table is known to exist; a failed attempt leaves it unset
    schema_ready: OnceCell<()>,
}

impl SecondaryRepo {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self {
            pool,
            timeout,
            schema_ready: OnceCell::new(),
        }
    }

    /// Create the table if it is absent. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| async {
                bounded(self.timeout, TABLE, sqlx::query(CREATE_TABLE).execute(&self.pool))
                    .await?;
                tracing::debug!(table = TABLE, "secondary schema ready");
                Ok::<_, StoreError>(())
            })
            .await?;

        Ok(())
    }
}

#[async_trait]
impl SecondaryStore for SecondaryRepo {
    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError> {
        self.ensure_schema().await?;

        bounded(
            self.timeout,
            TABLE,
            sqlx::query(
                r#"
                INSERT INTO contact_replicas (id, first_name, last_name, phone_work)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id.as_uuid())
            .bind(fields.first_name())
            .bind(fields.last_name())
            .bind(fields.phone_work())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    /// Replicas carry no deleted flag; any row with this id is rewritten.
    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError> {
        self.ensure_schema().await?;

        let result = bounded(
            self.timeout,
            TABLE,
            sqlx::query(
                r#"
                UPDATE contact_replicas
                SET first_name = $2, last_name = $3, phone_work = $4
                WHERE id = $1
                "#,
            )
            .bind(id.as_uuid())
            .bind(fields.first_name())
            .bind(fields.last_name())
            .bind(fields.phone_work())
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &ContactId) -> Result<u64, StoreError> {
        self.ensure_schema().await?;

        let result = bounded(
            self.timeout,
            TABLE,
            sqlx::query("DELETE FROM contact_replicas WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        bounded(self.timeout, TABLE, sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}
