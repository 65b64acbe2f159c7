//! contactsync-server: HTTP bridge for CRM contacts
//!
//! Serves CRUD on contacts, reading from the CRM database (primary) and
//! mirroring every accepted write into a replica database (secondary).

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

use std::sync::Arc;

use crate::db::{create_primary_pool, create_secondary_pool, PrimaryRepo, SecondaryRepo};

pub use config::{BridgeConfig, ConfigError};
pub use service::{ContactService, ServiceError, StoreKind};

/// Wire both store adapters into a contact service.
///
/// Pools connect lazily, so this succeeds even when a store is down. Must be
/// called inside a Tokio runtime.
pub fn build_service(config: &BridgeConfig) -> ContactService {
    let primary_pool = create_primary_pool(&config.primary, config.pool);
    let secondary_pool = create_secondary_pool(&config.secondary, config.pool);

    ContactService::new(
        Arc::new(PrimaryRepo::new(primary_pool, config.pool.timeout)),
        Arc::new(SecondaryRepo::new(secondary_pool, config.pool.timeout)),
    )
}
