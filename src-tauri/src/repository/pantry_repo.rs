//! Pantry Repository
//!
//! The four pantry mutations plus `list`, written against any `DocumentStore`.
//! Increment and decrement go through the store's atomic `update`, so
//! concurrent callers never lose an update.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, ItemName, PantryItem, Quantity};
use super::traits::{DocumentStore, StoredDocument};

fn to_item(doc: StoredDocument) -> PantryItem {
    PantryItem::new(doc.id, doc.count)
}

/// Pantry operations over a document store
#[derive(Clone)]
pub struct PantryRepository {
    store: Arc<dyn DocumentStore>,
}

impl PantryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every item, in arrival order
    pub async fn list(&self) -> DomainResult<Vec<PantryItem>> {
        let docs = self.store.list().await?;
        Ok(docs.into_iter().map(to_item).collect())
    }

    /// Add one. Creates the item at 1 if it does not exist.
    pub async fn increment(&self, name: &ItemName) -> DomainResult<PantryItem> {
        let id = name.as_str();
        let next = self
            .store
            .update(id, &|count| Some(count.map_or(1, |c| c.saturating_add(1))))
            .await?;
        next.map(|count| PantryItem::new(id, count))
            .ok_or_else(|| DomainError::Internal(format!("'{}' vanished during increment", id)))
    }

    /// Take one away. Absent is a no-op; the last unit deletes the record.
    ///
    /// Returns the item as it now stands, `None` if it no longer exists.
    pub async fn decrement(&self, name: &ItemName) -> DomainResult<Option<PantryItem>> {
        let id = name.as_str();
        // A zero record (only reachable via set_quantity) is cleared as well
        let next = self
            .store
            .update(id, &|count| count.filter(|&c| c > 1).map(|c| c - 1))
            .await?;
        Ok(next.map(|count| PantryItem::new(id, count)))
    }

    /// Overwrite (or create) with an absolute quantity. Zero is kept as a record.
    pub async fn set_quantity(&self, name: &ItemName, count: Quantity) -> DomainResult<PantryItem> {
        self.store.put(name.as_str(), count.get()).await?;
        Ok(PantryItem::new(name.as_str(), count.get()))
    }

    /// Delete unconditionally; absent is a no-op
    pub async fn remove(&self, name: &ItemName) -> DomainResult<()> {
        self.store.delete(name.as_str()).await
    }
}
