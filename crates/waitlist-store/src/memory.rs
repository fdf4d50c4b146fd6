//! In-memory store backed by a `DashMap` keyed by identifier.
//!
//! Used when no persistence service is configured, and in tests. Data is
//! lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;
use waitlist_core::{NewWaitlistEntry, UniqueId, WaitlistEntry};

use crate::error::StoreError;
use crate::WaitlistStore;

/// Cheaply cloneable; all clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<DashMap<UniqueId, WaitlistEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn insert(&self, entry: NewWaitlistEntry) -> Result<WaitlistEntry, StoreError> {
        match self.rows.entry(entry.unique_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict {
                unique_id: entry.unique_id.to_string(),
            }),
            Entry::Vacant(slot) => {
                let stored = entry.into_entry(Uuid::new_v4(), Utc::now());
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn find_by_unique_id(&self, id: &UniqueId) -> Result<Vec<WaitlistEntry>, StoreError> {
        Ok(self
            .rows
            .get(id)
            .map(|row| vec![row.value().clone()])
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waitlist_core::Draft;

    fn draft() -> Draft {
        serde_json::from_value(serde_json::json!({
            "fullName": "Marie Tremblay",
            "jobTitle": "Directrice",
            "email": "marie@example.ca",
            "phoneNumber": "514 555 0199",
            "language": "french",
            "companyName": "Tremblay Construction",
            "businessSector": "Construction",
            "hasCapacity": "yes",
            "interestedInAutomation": "no",
            "targetMarkets": ["municipal"],
            "budget": "50-200",
            "alertMethod": "sms",
            "betaTester": "yes"
        }))
        .unwrap()
    }

    fn new_entry() -> NewWaitlistEntry {
        NewWaitlistEntry::generate(draft().coerce().unwrap())
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = MemoryStore::new();
        let created = store.insert(new_entry()).await.unwrap();
        let found = store.find_by_unique_id(&created.unique_id).await.unwrap();
        assert_eq!(found, vec![created]);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_identifier_conflicts() {
        let store = MemoryStore::new();
        let entry = new_entry();
        store.insert(entry.clone()).await.unwrap();
        let err = store.insert(entry).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn unknown_identifier_finds_nothing() {
        let store = MemoryStore::new();
        let id = UniqueId::new("missing").unwrap();
        assert!(store.find_by_unique_id(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_rows() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.insert(new_entry()).await.unwrap();
        assert!(!other.is_empty());
    }
}
