//! Bridge configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRIMARY_DB_USER`, `PRIMARY_DB_PASSWORD`, `PRIMARY_DB_NAME` - CRM (MySQL) credentials
//! - `SECONDARY_DB_USER`, `SECONDARY_DB_PASSWORD`, `SECONDARY_DB_NAME` - replica (Postgres) credentials
//!
//! ## Optional
//! - `PRIMARY_DB_HOST` / `SECONDARY_DB_HOST` - Store hosts (default: 127.0.0.1)
//! - `PRIMARY_DB_PORT` / `SECONDARY_DB_PORT` - Store ports (default: 3306 / 5432)
//! - `CORS_ORIGINS` - Comma-separated allowed origins, `*` for any (default: *)
//! - `CONTACTSYNC_BIND` - Listen address (default: 127.0.0.1:8000)
//! - `STORE_TIMEOUT_SECS` - Per-call bound for every store call (default: 5)
//! - `STORE_MAX_CONNECTIONS` - Pool size per store (default: 5)

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PRIMARY_PORT: u16 = 3306;
const DEFAULT_SECONDARY_PORT: u16 = 5432;
const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for one relational store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Redacted in `Debug` output
    pub password: SecretString,
    pub database: String,
}

/// Origins allowed to call the bridge from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Pool sizing and time bounds shared by both stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Bounds connection acquisition and every statement
    pub timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Full bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub primary: StoreConfig,
    pub secondary: StoreConfig,
    pub cors_origins: CorsOrigins,
    pub bind_addr: SocketAddr,
    pub pool: PoolSettings,
}

impl BridgeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let primary = StoreConfig::load(&env, "PRIMARY", DEFAULT_PRIMARY_PORT)?;
        let secondary = StoreConfig::load(&env, "SECONDARY", DEFAULT_SECONDARY_PORT)?;
        let cors_origins = parse_origins(&env.or_default("CORS_ORIGINS", "*"))?;
        let bind_addr = env.parsed("CONTACTSYNC_BIND", DEFAULT_BIND)?;

        let timeout_secs: u64 = env.parsed("STORE_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let max_connections: u32 =
            env.parsed("STORE_MAX_CONNECTIONS", &DEFAULT_MAX_CONNECTIONS.to_string())?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STORE_MAX_CONNECTIONS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            primary,
            secondary,
            cors_origins,
            bind_addr,
            pool: PoolSettings {
                max_connections,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

impl StoreConfig {
    fn load<F>(env: &Env<F>, prefix: &str, default_port: u16) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &str| format!("{prefix}_DB_{name}");

        Ok(Self {
            host: env.or_default(&key("HOST"), DEFAULT_HOST),
            port: env.parsed(&key("PORT"), &default_port.to_string())?,
            user: env.required(&key("USER"))?,
            password: SecretString::from(env.required(&key("PASSWORD"))?),
            database: env.required(&key("NAME"))?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as missing.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                ConfigError::InvalidEnvVar("CORS_ORIGINS".to_string(), e.to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
