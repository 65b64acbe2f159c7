//! Store adapters for the two contact stores
//!
//! Each adapter follows these patterns:
//! - One pooled connection per call, released on every exit path
//! - Every call bounded by the configured timeout
//! - No retries; a failed call fails immediately

pub mod memory;
pub mod primary;
pub mod secondary;

use async_trait::async_trait;

use super::StoreError;
use crate::models::{Contact, ContactFields, ContactId};

pub use memory::{MemoryPrimary, MemorySecondary};
pub use primary::PrimaryRepo;
pub use secondary::SecondaryRepo;

/// System-of-record store (schema owned upstream)
#[async_trait]
pub trait PrimaryStore: Send + Sync {
    /// Active (not soft-deleted) contacts, newest entry first.
    ///
    /// Returns `StoreError::SchemaMissing` when the table does not exist.
    async fn list_active(&self) -> Result<Vec<Contact>, StoreError>;

    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError>;

    /// Rewrite all fields. Returns rows affected.
    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError>;

    /// Flag the row as deleted, keeping it. Returns rows affected.
    async fn soft_delete(&self, id: &ContactId) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Derived store (schema owned by this service)
#[async_trait]
pub trait SecondaryStore: Send + Sync {
    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError>;

    /// Rewrite all fields. Returns rows affected.
    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError>;

    /// Remove the row. Returns rows affected.
    async fn delete(&self, id: &ContactId) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
