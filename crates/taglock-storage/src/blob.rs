//! Durable key-value blob store backing the whitelist.
//!
//! The store exposes exactly the operations the whitelist needs from
//! its durable facility: read a blob by key, replace a blob by key
//! committed as a unit. The SQLite implementation maps the key space
//! to a single `blobs` table; the in-memory implementation backs tests
//! and supports failure injection.

#![allow(async_fn_in_trait)]

use crate::connection::Database;
use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Durable key-value blob facility.
///
/// Implementations must make `put` atomic: after a crash, a reader
/// sees either the previous blob or the new one, never a torn write.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` on virgin storage.
    ///
    /// # Errors
    /// Returns an error if durable storage cannot be opened or read.
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the blob stored under `key` and commit.
    ///
    /// # Errors
    /// Returns an error if the write or commit fails; the previous
    /// blob remains in place.
    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()>;
}

/// Blob store over the SQLite `blobs` table.
///
/// # Examples
///
/// ```no_run
/// use taglock_storage::blob::{BlobStore, SqliteBlobStore};
/// use taglock_storage::connection::Database;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::in_memory().await?;
/// let store = SqliteBlobStore::new(db);
///
/// store.put("tags", &[0u8; 512]).await?;
/// assert_eq!(store.get("tags").await?.unwrap().len(), 512);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    db: Database,
}

impl SqliteBlobStore {
    /// Create a blob store over an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT value FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let mut tx = self.db.pool().begin().await?;
        sqlx::query(
            "INSERT INTO blobs (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

/// In-memory blob store for tests and development.
///
/// Clones share the same underlying map, so a test can hold one clone
/// for inspection while the whitelist owns another. Read and write
/// failures can be injected to exercise degraded paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `get` calls fail with `Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `put` calls fail with `Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "injected read failure".to_string(),
            ));
        }
        Ok(self.blobs.read().expect("blob map poisoned").get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "injected write failure".to_string(),
            ));
        }
        self.blobs
            .write()
            .expect("blob map poisoned")
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
