//! Repository Layer - Core Traits
//!
//! Defines the document-store seam the pantry logic is written against.
//! Implementations: SQLite (local) and Firestore (REST).

use async_trait::async_trait;
use crate::domain::DomainResult;
use super::retry::cas_update;

/// Opaque per-document write token. Changes on every write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(pub String);

/// A `{ count }` document as read back from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub count: i64,
    pub revision: Revision,
}

/// Maps the current count (`None` if absent) to the next one (`None` deletes)
pub type CountStep = dyn Fn(Option<i64>) -> Option<i64> + Send + Sync;

/// Keyed collection of `{ count }` documents
///
/// All operations are async to support local and remote backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, id: &str) -> DomainResult<Option<StoredDocument>>;

    /// Full scan of the collection, in arrival order
    async fn list(&self) -> DomainResult<Vec<StoredDocument>>;

    /// Unconditional upsert
    async fn put(&self, id: &str, count: i64) -> DomainResult<()>;

    /// Unconditional delete; absent documents are not an error
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Conditional write.
    ///
    /// `expected = None` requires the document to be absent, `Some(rev)` requires
    /// its current revision to equal `rev`. `next = None` deletes, `Some(count)`
    /// writes. Returns `false` if the precondition did not hold and nothing changed.
    async fn compare_and_swap(
        &self,
        id: &str,
        expected: Option<&Revision>,
        next: Option<i64>,
    ) -> DomainResult<bool>;

    /// Atomic read-modify-write of one document's count.
    ///
    /// Returns the count now stored, `None` if the document is absent
    /// afterwards. The default retries `compare_and_swap`; stores with
    /// transactions override it.
    async fn update(&self, id: &str, step: &CountStep) -> DomainResult<Option<i64>> {
        cas_update(self, id, step).await
    }
}
