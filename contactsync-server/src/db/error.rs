//! Store error taxonomy and per-call time bounds

use std::future::Future;
use std::time::Duration;

/// MySQL SQLSTATE for "table doesn't exist"
const MYSQL_NO_SUCH_TABLE: &str = "42S02";

/// Postgres SQLSTATE for "undefined_table"
const PG_UNDEFINED_TABLE: &str = "42P01";

/// Error from a single store call
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection could not be established or was lost
    #[error("store unreachable: {0}")]
    Unreachable(#[source] sqlx::Error),

    /// Call did not finish within the configured bound
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Target table is absent
    #[error("table '{table}' does not exist")]
    SchemaMissing { table: &'static str },

    /// Query or constraint failure
    #[error("statement failed: {0}")]
    Statement(#[source] sqlx::Error),
}

impl StoreError {
    /// Classify a driver error raised while working on `table`.
    pub fn from_sqlx(err: sqlx::Error, table: &'static str) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unreachable(err),
            sqlx::Error::Database(db)
                if matches!(
                    db.code().as_deref(),
                    Some(MYSQL_NO_SUCH_TABLE) | Some(PG_UNDEFINED_TABLE)
                ) =>
            {
                Self::SchemaMissing { table }
            }
            _ => Self::Statement(err),
        }
    }

    /// Simulated connection failure, used by the memory stores.
    pub fn unreachable(reason: &str) -> Self {
        Self::Unreachable(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            reason.to_owned(),
        )))
    }

    pub fn is_schema_missing(&self) -> bool {
        matches!(self, Self::SchemaMissing { .. })
    }
}

/// Run a store call with a time bound, classifying any driver error.
///
/// Dropping the call on timeout drops its pooled connection as well, so a
/// stalled statement never holds a connection past the bound.
pub async fn bounded<T, F>(limit: Duration, table: &'static str, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|e| StoreError::from_sqlx(e, table)),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    /// Driver error carrying only a SQLSTATE
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl fmt::Display for SqlState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.0)
        }
    }

    impl std::error::Error for SqlState {}

    impl DatabaseError for SqlState {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn database_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(SqlState(code)))
    }

    #[test]
    fn mysql_missing_table_is_schema_missing() {
        let err = StoreError::from_sqlx(database_error("42S02"), "contacts");
        assert!(matches!(err, StoreError::SchemaMissing { table: "contacts" }));
    }

    #[test]
    fn postgres_undefined_table_is_schema_missing() {
        let err = StoreError::from_sqlx(database_error("42P01"), "contact_replicas");
        assert!(matches!(
            err,
            StoreError::SchemaMissing { table: "contact_replicas" }
        ));
    }

    #[test]
    fn other_sqlstates_are_statement_failures() {
        // 23000: integrity constraint violation (duplicate key)
        let err = StoreError::from_sqlx(database_error("23000"), "contacts");
        assert!(matches!(err, StoreError::Statement(_)));
        assert!(!err.is_schema_missing());
    }

    #[test]
    fn io_errors_are_unreachable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::from_sqlx(sqlx::Error::Io(io), "contacts");
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[test]
    fn pool_timeout_is_unreachable() {
        let err = StoreError::from_sqlx(sqlx::Error::PoolTimedOut, "contacts");
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[test]
    fn row_not_found_is_statement_failure() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound, "contacts");
        assert!(matches!(err, StoreError::Statement(_)));
        assert!(!err.is_schema_missing());
    }

    #[tokio::test]
    async fn bounded_passes_results_through() {
        let value = bounded(Duration::from_secs(1), "contacts", async { Ok::<_, sqlx::Error>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn bounded_times_out_stalled_calls() {
        let result: Result<(), StoreError> =
            bounded(Duration::from_millis(10), "contacts", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::Timeout(d)) if d == Duration::from_millis(10)));
    }
}
