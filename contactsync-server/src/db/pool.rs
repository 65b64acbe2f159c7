//! Database connection pool management
//!
//! One pool per store. Pools connect lazily, so the bridge starts even when a
//! store is down; the first call against an unreachable store fails within the
//! acquire timeout instead.

use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{MySqlPool, PgPool};

use crate::config::{PoolSettings, StoreConfig};

/// Create the pool for the primary (CRM, MySQL) store.
///
/// Does not open a connection.
pub fn create_primary_pool(store: &StoreConfig, settings: PoolSettings) -> MySqlPool {
    let options = MySqlConnectOptions::new()
        .host(&store.host)
        .port(store.port)
        .username(&store.user)
        .password(store.password.expose_secret())
        .database(&store.database);

    MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.timeout)
        .connect_lazy_with(options)
}

/// Create the pool for the secondary (replica, Postgres) store.
///
/// Does not open a connection.
pub fn create_secondary_pool(store: &StoreConfig, settings: PoolSettings) -> PgPool {
    let options = PgConnectOptions::new()
        .host(&store.host)
        .port(store.port)
        .username(&store.user)
        .password(store.password.expose_secret())
        .database(&store.database);

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.timeout)
        .connect_lazy_with(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn store(port: u16) -> StoreConfig {
        StoreConfig {
            host: "127.0.0.1".into(),
            port,
            user: "nobody".into(),
            password: SecretString::from("nothing".to_string()),
            database: "nowhere".into(),
        }
    }

    #[tokio::test]
    async fn pools_are_lazy() {
        // Nothing listens on port 1; creation must still succeed
        let primary = create_primary_pool(&store(1), PoolSettings::default());
        let secondary = create_secondary_pool(&store(1), PoolSettings::default());

        assert_eq!(primary.size(), 0);
        assert_eq!(secondary.size(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn secondary_pool_acquires_connection() {
        let url = std::env::var("SECONDARY_DATABASE_URL").expect("SECONDARY_DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
