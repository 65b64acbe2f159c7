//! Primary store adapter - upstream CRM `contacts` table (MySQL)
//!
//! The table belongs to the CRM. This adapter never creates or alters it:
//! - list: probe for the table, then select active rows
//! - writes: plain statements; a missing table is a hard failure

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use super::PrimaryStore;
use crate::db::{bounded, StoreError};
use crate::models::{Contact, ContactFields, ContactId};

const TABLE: &str = "contacts";

/// Contact row as stored by the CRM (name columns are nullable upstream)
#[derive(Debug, FromRow)]
struct ContactRow {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_work: Option<String>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            phone_work: row.phone_work.unwrap_or_default(),
        }
    }
}

/// Primary store repository
#[derive(Clone)]
pub struct PrimaryRepo {
    pool: MySqlPool,
    timeout: Duration,
}

impl PrimaryRepo {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl PrimaryStore for PrimaryRepo {
    /// Probe and select share one connection.
    async fn list_active(&self) -> Result<Vec<Contact>, StoreError> {
        let rows = bounded(self.timeout, TABLE, async {
            let mut conn = self.pool.acquire().await?;

            let (present,): (i64,) = sqlx::query_as(
                r#"
                SELECT COUNT(*)
                FROM information_schema.tables
                WHERE table_schema = DATABASE() AND table_name = ?
                "#,
            )
            .bind(TABLE)
            .fetch_one(&mut *conn)
            .await?;

            if present == 0 {
                return Ok(None);
            }

            let rows: Vec<ContactRow> = sqlx::query_as(
                r#"
                SELECT id, first_name, last_name, phone_work
                FROM contacts
                WHERE deleted = 0
                ORDER BY date_entered DESC
                "#,
            )
            .fetch_all(&mut *conn)
            .await?;

            Ok::<_, sqlx::Error>(Some(rows))
        })
        .await?;

        match rows {
            Some(rows) => Ok(rows.into_iter().map(Contact::from).collect()),
            None => Err(StoreError::SchemaMissing { table: TABLE }),
        }
    }

    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError> {
        bounded(
            self.timeout,
            TABLE,
            sqlx::query(
                r#"
                INSERT INTO contacts
                    (id, first_name, last_name, phone_work, deleted, date_entered, date_modified)
                VALUES (?, ?, ?, ?, 0, UTC_TIMESTAMP(), UTC_TIMESTAMP())
                "#,
            )
            .bind(id.to_string())
            .bind(fields.first_name())
            .bind(fields.last_name())
            .bind(fields.phone_work())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    /// Soft-deleted rows are left untouched.
    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError> {
        let result = bounded(
            self.timeout,
            TABLE,
            sqlx::query(
                r#"
                UPDATE contacts
                SET first_name = ?, last_name = ?, phone_work = ?, date_modified = UTC_TIMESTAMP()
                WHERE id = ? AND deleted = 0
                "#,
            )
            .bind(fields.first_name())
            .bind(fields.last_name())
            .bind(fields.phone_work())
            .bind(id.to_string())
            .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&self, id: &ContactId) -> Result<u64, StoreError> {
        let result = bounded(
            self.timeout,
            TABLE,
            sqlx::query(
                "UPDATE contacts SET deleted = 1, date_modified = UTC_TIMESTAMP() WHERE id = ?",
            )
            .bind(id.to_string())
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
