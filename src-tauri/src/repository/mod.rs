//! Repository Layer
//!
//! Document-store abstraction, its SQLite and Firestore backends, and the
//! pantry operations built on top.

mod traits;
mod retry;
mod db;
mod firestore;
mod pantry_repo;
mod store_state;


pub use traits::{DocumentStore, Revision, StoredDocument};
pub use retry::MAX_CAS_ATTEMPTS;
pub use db::{open_db, SqliteStore};
pub use firestore::{FirestoreSettings, FirestoreStore};
pub use pantry_repo::PantryRepository;
pub use store_state::{connect, StoreState};
