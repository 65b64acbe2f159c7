//! Contact service - dual-write orchestration
//!
//! Reads come from the primary only. Writes go to the primary first and then
//! to the secondary, strictly in sequence. The two policies differ by
//! operation:
//!
//! - create: a secondary failure is reported as a partial sync, never as an
//!   error. The primary row stays.
//! - update/delete: a failure in either store fails the whole operation, even
//!   when the primary has already applied the change.
//!
//! Nothing is rolled back, retried, or reconciled later.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::db::{PrimaryStore, SecondaryStore, StoreError};
use crate::models::{Contact, ContactFields, ContactId};

/// Warning attached to a create that reached only the primary
pub const PARTIAL_SYNC_WARNING: &str =
    "contact saved to primary store; secondary store sync failed";

/// Which store a write reached (or failed in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Primary,
    Secondary,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// Result of a successful create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub id: ContactId,
    /// Stores that hold the new row
    pub synced: Vec<StoreKind>,
    /// Present only for a partial sync
    pub warning: Option<&'static str>,
}

impl CreateOutcome {
    pub fn is_partial(&self) -> bool {
        self.warning.is_some()
    }
}

/// Service error. Display text is safe to show callers; the store error is
/// kept as the source for logging.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("contacts are temporarily unavailable")]
    Unavailable(#[source] StoreError),

    #[error("failed to create contact")]
    CreateFailed(#[source] StoreError),

    #[error("failed to update contact {id}")]
    UpdateFailed {
        id: ContactId,
        store: StoreKind,
        #[source]
        source: StoreError,
    },

    #[error("failed to delete contact {id}")]
    DeleteFailed {
        id: ContactId,
        store: StoreKind,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::Unavailable(source) | Self::CreateFailed(source) => source,
            Self::UpdateFailed { source, .. } | Self::DeleteFailed { source, .. } => source,
        }
    }
}

/// Contact service over a primary and a secondary store
#[derive(Clone)]
pub struct ContactService {
    primary: Arc<dyn PrimaryStore>,
    secondary: Arc<dyn SecondaryStore>,
}

impl ContactService {
    pub fn new(primary: Arc<dyn PrimaryStore>, secondary: Arc<dyn SecondaryStore>) -> Self {
        Self { primary, secondary }
    }

    /// Active contacts, newest first. A primary without the contacts table
    /// (fresh CRM install) reads as empty.
    pub async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        match self.primary.list_active().await {
            Ok(contacts) => Ok(contacts),
            Err(e) if e.is_schema_missing() => {
                debug!("primary contacts table absent, returning empty list");
                Ok(Vec::new())
            }
            Err(e) => Err(ServiceError::Unavailable(e)),
        }
    }

    /// Create a contact under a freshly minted id.
    pub async fn create(&self, fields: &ContactFields) -> Result<CreateOutcome, ServiceError> {
        let id = ContactId::generate();

        self.primary
            .insert(&id, fields)
            .await
            .map_err(ServiceError::CreateFailed)?;

        match self.secondary.insert(&id, fields).await {
            Ok(()) => {
                info!(contact_id = %id, "contact created in both stores");
                Ok(CreateOutcome {
                    id,
                    synced: vec![StoreKind::Primary, StoreKind::Secondary],
                    warning: None,
                })
            }
            Err(e) => {
                warn!(contact_id = %id, error = %e, "secondary sync failed, contact kept in primary");
                Ok(CreateOutcome {
                    id,
                    synced: vec![StoreKind::Primary],
                    warning: Some(PARTIAL_SYNC_WARNING),
                })
            }
        }
    }

    /// Rewrite all fields in both stores. No existence check: an unknown id
    /// updates nothing and still succeeds.
    pub async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<(), ServiceError> {
        let primary_rows = self.primary.update(id, fields).await.map_err(|source| {
            ServiceError::UpdateFailed {
                id: *id,
                store: StoreKind::Primary,
                source,
            }
        })?;

        let secondary_rows = self.secondary.update(id, fields).await.map_err(|source| {
            error!(
                contact_id = %id,
                error = %source,
                "secondary update failed after primary update; stores have diverged"
            );
            ServiceError::UpdateFailed {
                id: *id,
                store: StoreKind::Secondary,
                source,
            }
        })?;

        if primary_rows == 0 {
            debug!(contact_id = %id, secondary_rows, "update matched no primary row");
        }
        info!(contact_id = %id, "contact updated");
        Ok(())
    }

    /// Soft delete in the primary, physical delete in the secondary.
    pub async fn delete(&self, id: &ContactId) -> Result<(), ServiceError> {
        let primary_rows = self.primary.soft_delete(id).await.map_err(|source| {
            ServiceError::DeleteFailed {
                id: *id,
                store: StoreKind::Primary,
                source,
            }
        })?;

        let secondary_rows = self.secondary.delete(id).await.map_err(|source| {
            error!(
                contact_id = %id,
                error = %source,
                "secondary delete failed after primary soft delete; stores have diverged"
            );
            ServiceError::DeleteFailed {
                id: *id,
                store: StoreKind::Secondary,
                source,
            }
        })?;

        if primary_rows == 0 {
            debug!(contact_id = %id, secondary_rows, "delete matched no primary row");
        }
        info!(contact_id = %id, "contact deleted");
        Ok(())
    }

    /// Reachability of each store, primary first.
    pub async fn ping(&self) -> [(StoreKind, Result<(), StoreError>); 2] {
        [
            (StoreKind::Primary, self.primary.ping().await),
            (StoreKind::Secondary, self.secondary.ping().await),
        ]
    }
}
