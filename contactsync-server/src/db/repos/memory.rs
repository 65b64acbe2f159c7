//! In-memory store implementations for testing
//!
//! Both stores mirror the semantics of their database counterparts (soft
//! delete on the primary, physical delete on the secondary) and can simulate
//! an outage or, for the primary, a missing table.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{PrimaryStore, SecondaryStore};
use crate::db::StoreError;
use crate::models::{Contact, ContactFields, ContactId};

#[derive(Debug)]
struct PrimaryRow {
    contact: Contact,
    deleted: bool,
    entered: u64,
}

#[derive(Debug, Default)]
struct PrimaryState {
    rows: Vec<PrimaryRow>,
    next_entry: u64,
    unreachable: bool,
    schema_missing: bool,
    writes: u64,
}

/// Mock primary store
#[derive(Debug, Default)]
pub struct MemoryPrimary {
    state: Mutex<PrimaryState>,
}

impl MemoryPrimary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary whose `contacts` table has not been created yet
    pub fn without_schema() -> Self {
        let store = Self::default();
        store.lock().schema_missing = true;
        store
    }

    /// Simulate the store going down (or coming back)
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// `Some(deleted flag)` if a row with this id exists, deleted or not
    pub fn deleted_flag(&self, id: &ContactId) -> Option<bool> {
        let id = id.to_string();
        self.lock()
            .rows
            .iter()
            .find(|r| r.contact.id == id)
            .map(|r| r.deleted)
    }

    /// Number of write calls received, failed ones included
    pub fn write_attempts(&self) -> u64 {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, PrimaryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn writable(&self) -> Result<MutexGuard<'_, PrimaryState>, StoreError> {
        let mut state = self.lock();
        state.writes += 1;
        state.check()?;
        Ok(state)
    }
}

impl PrimaryState {
    fn check(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::unreachable("primary store is down"));
        }
        if self.schema_missing {
            return Err(StoreError::SchemaMissing { table: "contacts" });
        }
        Ok(())
    }
}

#[async_trait]
impl PrimaryStore for MemoryPrimary {
    async fn list_active(&self) -> Result<Vec<Contact>, StoreError> {
        let state = self.lock();
        state.check()?;

        let mut active: Vec<&PrimaryRow> = state.rows.iter().filter(|r| !r.deleted).collect();
        active.sort_by(|a, b| b.entered.cmp(&a.entered));
        Ok(active.into_iter().map(|r| r.contact.clone()).collect())
    }

    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError> {
        let mut state = self.writable()?;

        let contact = Contact::new(id, fields);
        if state.rows.iter().any(|r| r.contact.id == contact.id) {
            return Err(StoreError::Statement(sqlx::Error::Protocol(format!(
                "duplicate entry '{}' for key 'PRIMARY'",
                contact.id
            ))));
        }

        state.next_entry += 1;
        let entered = state.next_entry;
        state.rows.push(PrimaryRow {
            contact,
            deleted: false,
            entered,
        });
        Ok(())
    }

    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError> {
        let mut state = self.writable()?;

        let updated = Contact::new(id, fields);
        let mut affected = 0;
        for row in state
            .rows
            .iter_mut()
            .filter(|r| r.contact.id == updated.id && !r.deleted)
        {
            row.contact = updated.clone();
            affected += 1;
        }
        Ok(affected)
    }

    async fn soft_delete(&self, id: &ContactId) -> Result<u64, StoreError> {
        let mut state = self.writable()?;

        let id = id.to_string();
        let mut affected = 0;
        for row in state.rows.iter_mut().filter(|r| r.contact.id == id) {
            row.deleted = true;
            affected += 1;
        }
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.lock().unreachable {
            return Err(StoreError::unreachable("primary store is down"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SecondaryState {
    rows: Vec<Contact>,
    unreachable: bool,
    writes: u64,
}

/// Mock secondary store
#[derive(Debug, Default)]
pub struct MemorySecondary {
    state: Mutex<SecondaryState>,
}

impl MemorySecondary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    pub fn get(&self, id: &ContactId) -> Option<Contact> {
        let id = id.to_string();
        self.lock().rows.iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of write calls received, failed ones included
    pub fn write_attempts(&self) -> u64 {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, SecondaryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn writable(&self) -> Result<MutexGuard<'_, SecondaryState>, StoreError> {
        let mut state = self.lock();
        state.writes += 1;
        if state.unreachable {
            return Err(StoreError::unreachable("secondary store is down"));
        }
        Ok(state)
    }
}

#[async_trait]
impl SecondaryStore for MemorySecondary {
    async fn insert(&self, id: &ContactId, fields: &ContactFields) -> Result<(), StoreError> {
        let mut state = self.writable()?;

        let contact = Contact::new(id, fields);
        if state.rows.iter().any(|c| c.id == contact.id) {
            return Err(StoreError::Statement(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint \"contact_replicas_pkey\" ({})",
                contact.id
            ))));
        }

        state.rows.push(contact);
        Ok(())
    }

    async fn update(&self, id: &ContactId, fields: &ContactFields) -> Result<u64, StoreError> {
        let mut state = self.writable()?;

        let updated = Contact::new(id, fields);
        let mut affected = 0;
        for row in state.rows.iter_mut().filter(|c| c.id == updated.id) {
            *row = updated.clone();
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, id: &ContactId) -> Result<u64, StoreError> {
        let mut state = self.writable()?;

        let id = id.to_string();
        let before = state.rows.len();
        state.rows.retain(|c| c.id != id);
        Ok((before - state.rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.lock().unreachable {
            return Err(StoreError::unreachable("secondary store is down"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(first: &str, last: &str) -> ContactFields {
        ContactFields::new(first, last, "").unwrap()
    }

    #[tokio::test]
    async fn primary_lists_newest_first() {
        let store = MemoryPrimary::new();
        let first = ContactId::generate();
        let second = ContactId::generate();

        store.insert(&first, &fields("Ada", "Lovelace")).await.unwrap();
        store.insert(&second, &fields("Grace", "Hopper")).await.unwrap();

        let listed = store.list_active().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.to_string());
        assert_eq!(listed[1].id, first.to_string());
    }

    #[tokio::test]
    async fn primary_soft_delete_keeps_row() {
        let store = MemoryPrimary::new();
        let id = ContactId::generate();
        store.insert(&id, &fields("Ada", "Lovelace")).await.unwrap();

        assert_eq!(store.soft_delete(&id).await.unwrap(), 1);
        assert_eq!(store.deleted_flag(&id), Some(true));
        assert!(store.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn primary_without_schema_fails_writes() {
        let store = MemoryPrimary::without_schema();

        let err = store
            .insert(&ContactId::generate(), &fields("Ada", "Lovelace"))
            .await
            .unwrap_err();
        assert!(err.is_schema_missing());
        assert!(store.list_active().await.unwrap_err().is_schema_missing());
    }

    #[tokio::test]
    async fn primary_rejects_duplicate_ids() {
        let store = MemoryPrimary::new();
        let id = ContactId::generate();
        store.insert(&id, &fields("Ada", "Lovelace")).await.unwrap();

        let err = store.insert(&id, &fields("Ada", "Lovelace")).await.unwrap_err();
        assert!(matches!(err, StoreError::Statement(_)));
    }

    #[tokio::test]
    async fn secondary_rejects_duplicate_ids() {
        let store = MemorySecondary::new();
        let id = ContactId::generate();
        store.insert(&id, &fields("Ada", "Lovelace")).await.unwrap();

        let err = store.insert(&id, &fields("Grace", "Hopper")).await.unwrap_err();
        assert!(matches!(err, StoreError::Statement(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().first_name, "Ada");
    }

    #[tokio::test]
    async fn secondary_delete_is_physical() {
        let store = MemorySecondary::new();
        let id = ContactId::generate();
        store.insert(&id, &fields("Ada", "Lovelace")).await.unwrap();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn outage_counts_attempts() {
        let store = MemorySecondary::new();
        store.set_unreachable(true);

        let err = store
            .insert(&ContactId::generate(), &fields("Ada", "Lovelace"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unreachable(_)));
        assert_eq!(store.write_attempts(), 1);
        assert!(store.ping().await.is_err());
    }
}
