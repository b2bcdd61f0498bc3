//! Store State
//!
//! Holds the active pantry repository. Starts empty and is filled by the
//! background initialisation task, and replaced when the store config changes.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::{DomainError, DomainResult};
use super::db::{open_db, SqliteStore};
use super::firestore::{FirestoreSettings, FirestoreStore};
use super::pantry_repo::PantryRepository;
use super::traits::DocumentStore;

/// Shared slot for the active repository
#[derive(Clone, Default)]
pub struct StoreState {
    repo: Arc<RwLock<Option<PantryRepository>>>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the repository, failing if the store is not initialised yet
    pub async fn repository(&self) -> DomainResult<PantryRepository> {
        self.repo
            .read()
            .await
            .clone()
            .ok_or_else(|| DomainError::Unavailable("Store not initialized".to_string()))
    }

    pub async fn install(&self, repo: PantryRepository) {
        *self.repo.write().await = Some(repo);
    }
}

/// Build the document store described by `config`.
///
/// Firestore is probed once so a wrong project or database fails here with
/// `NotFound`. An unreachable network only logs a warning.
pub async fn connect(config: &StoreConfig, db_path: &Path) -> DomainResult<PantryRepository> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Sqlite => {
            let conn = open_db(db_path)?;
            log::info!("Opened SQLite store at {} (collection '{}')", db_path.display(), config.collection);
            Arc::new(SqliteStore::from_connection(conn, config.collection.clone()))
        }
        StoreBackend::Firestore => {
            let fs = config.firestore.as_ref().ok_or_else(|| {
                DomainError::InvalidInput("firestore backend selected without firestore settings".into())
            })?;
            log::info!(
                "Using Firestore project '{}' database '{}' (collection '{}')",
                fs.project_id, fs.database, config.collection
            );
            let store = FirestoreStore::new(FirestoreSettings {
                project_id: fs.project_id.clone(),
                database: fs.database.clone(),
                api_key: fs.api_key.clone(),
                collection: config.collection.clone(),
                timeout: Duration::from_secs(config.request_timeout_secs),
            })?;
            match store.verify().await {
                Ok(()) => {}
                Err(DomainError::Network(msg)) => log::warn!("Firestore not reachable yet: {}", msg),
                Err(e) => return Err(e),
            }
            Arc::new(store)
        }
    };
    Ok(PantryRepository::new(store))
}
