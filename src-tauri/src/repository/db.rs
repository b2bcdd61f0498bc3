//! SQLite Document Store
//!
//! Local backend: every collection lives in one `documents` table, each row a
//! JSON body keyed by (collection, id).

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use super::traits::{CountStep, DocumentStore, Revision, StoredDocument};

/// JSON body of a pantry document
#[derive(Debug, Serialize, Deserialize)]
struct CountBody {
    count: i64,
}

/// Open (or create) the database file and run migrations.
///
/// Pass `":memory:"` for a throwaway database.
pub fn open_db(db_path: &Path) -> DomainResult<Connection> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };
    run_migrations(&conn)?;
    Ok(conn)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    // seq is AUTOINCREMENT so a re-created document never reuses an old seq
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            UNIQUE(collection, id)
        )",
        [],
    )?;
    Ok(())
}

fn encode_body(count: i64) -> DomainResult<String> {
    serde_json::to_string(&CountBody { count }).map_err(|e| DomainError::Internal(e.to_string()))
}

fn decode_body(body: &str) -> DomainResult<i64> {
    serde_json::from_str::<CountBody>(body)
        .map(|b| b.count)
        .map_err(|e| DomainError::Internal(format!("corrupt document body '{}': {}", body, e)))
}

/// Revision tokens are `seq-revision`
fn revision_token(seq: i64, revision: i64) -> Revision {
    Revision(format!("{}-{}", seq, revision))
}

fn parse_revision(rev: &Revision) -> Option<(i64, i64)> {
    let (seq, revision) = rev.0.split_once('-')?;
    Some((seq.parse().ok()?, revision.parse().ok()?))
}

/// SQLite implementation of the document store
pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
    collection: String,
}

impl SqliteStore {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>, collection: impl Into<String>) -> Self {
        Self { conn, collection: collection.into() }
    }

    /// Convenience constructor for an already opened connection
    pub fn from_connection(conn: Connection, collection: impl Into<String>) -> Self {
        Self::new(Arc::new(Mutex::new(Some(conn))), collection)
    }
}

fn not_ready() -> DomainError {
    DomainError::Unavailable("Database not initialized".to_string())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, id: &str) -> DomainResult<Option<StoredDocument>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_ready)?;

        let row = conn
            .query_row(
                "SELECT seq, body, revision FROM documents WHERE collection = ? AND id = ?",
                params![self.collection, id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?)),
            )
            .optional()?;

        match row {
            Some((seq, body, revision)) => Ok(Some(StoredDocument {
                id: id.to_string(),
                count: decode_body(&body)?,
                revision: revision_token(seq, revision),
            })),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<StoredDocument>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_ready)?;

        let mut stmt = conn.prepare(
            "SELECT seq, id, body, revision FROM documents WHERE collection = ? ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![self.collection], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (seq, id, body, revision) = row?;
            docs.push(StoredDocument {
                id,
                count: decode_body(&body)?,
                revision: revision_token(seq, revision),
            });
        }
        Ok(docs)
    }

    async fn put(&self, id: &str, count: i64) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_ready)?;

        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO documents (collection, id, body, revision, created_at, updated_at)
             VALUES (?1, ?2, ?3, 1, ?4, ?4)
             ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                revision = revision + 1,
                updated_at = excluded.updated_at",
            params![self.collection, id, encode_body(count)?, now],
        )?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_ready)?;

        conn.execute(
            "DELETE FROM documents WHERE collection = ? AND id = ?",
            params![self.collection, id],
        )?;
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        id: &str,
        expected: Option<&Revision>,
        next: Option<i64>,
    ) -> DomainResult<bool> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_ready)?;
        let now = chrono::Utc::now().timestamp_millis();

        let changed = match (expected, next) {
            (None, Some(count)) => conn.execute(
                "INSERT OR IGNORE INTO documents (collection, id, body, revision, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 1, ?4, ?4)",
                params![self.collection, id, encode_body(count)?, now],
            )?,
            (None, None) => {
                // "absent -> absent": holds iff nothing is there
                let exists = conn
                    .query_row(
                        "SELECT 1 FROM documents WHERE collection = ? AND id = ?",
                        params![self.collection, id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                return Ok(!exists);
            }
            (Some(rev), next) => {
                let Some((seq, revision)) = parse_revision(rev) else {
                    return Ok(false);
                };
                match next {
                    Some(count) => conn.execute(
                        "UPDATE documents SET body = ?, revision = revision + 1, updated_at = ?
                         WHERE collection = ? AND id = ? AND seq = ? AND revision = ?",
                        params![encode_body(count)?, now, self.collection, id, seq, revision],
                    )?,
                    None => conn.execute(
                        "DELETE FROM documents WHERE collection = ? AND id = ? AND seq = ? AND revision = ?",
                        params![self.collection, id, seq, revision],
                    )?,
                }
            }
        };
        Ok(changed == 1)
    }

    /// Read and write inside one transaction while holding the connection
    async fn update(&self, id: &str, step: &CountStep) -> DomainResult<Option<i64>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_ready)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let body = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ? AND id = ?",
                params![self.collection, id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let current = body.as_deref().map(decode_body).transpose()?;
        let next = step(current);

        let now = chrono::Utc::now().timestamp_millis();
        match (current, next) {
            (None, None) => {}
            (_, Some(count)) => {
                tx.execute(
                    "INSERT INTO documents (collection, id, body, revision, created_at, updated_at)
                     VALUES (?1, ?2, ?3, 1, ?4, ?4)
                     ON CONFLICT(collection, id) DO UPDATE SET
                        body = excluded.body,
                        revision = revision + 1,
                        updated_at = excluded.updated_at",
                    params![self.collection, id, encode_body(count)?, now],
                )?;
            }
            (Some(_), None) => {
                tx.execute(
                    "DELETE FROM documents WHERE collection = ? AND id = ?",
                    params![self.collection, id],
                )?;
            }
        }
        tx.commit()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_token_roundtrip() {
        let rev = revision_token(12, 3);
        assert_eq!(rev.0, "12-3");
        assert_eq!(parse_revision(&rev), Some((12, 3)));
        assert_eq!(parse_revision(&Revision("2024-01-01T00:00:00Z".into())), None);
    }

    #[test]
    fn test_body_codec() {
        assert_eq!(encode_body(4).unwrap(), r#"{"count":4}"#);
        assert_eq!(decode_body(r#"{"count":7}"#).unwrap(), 7);
        assert!(decode_body("not json").is_err());
    }
}
