//! redb-backed snapshot store
//!
//! Explicit save/restore utility for entity collections. Nothing in the fetch
//! path reads or writes here; callers decide when a collection is worth
//! keeping.
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `snapshots` | `botecoProData-<key>` | JSON-serialized array |
//!
//! Values are stored exactly as `serde_json` writes them, so a load returns
//! what was persisted (modulo JSON's own number/string normalization).

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for snapshots: key = prefixed caller key, value = JSON bytes
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Namespace prefix of every stored key
pub const SNAPSHOT_KEY_PREFIX: &str = "botecoProData";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot {key} is {size} bytes, quota is {limit} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of [`StorageError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Quota exceeded or the disk is full
    Full,
    /// The store cannot be opened, read or written
    Unavailable,
    /// Data could not be encoded or decoded as JSON
    Serialization,
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::QuotaExceeded { .. } => StorageErrorKind::Full,
            Self::Storage(e) if is_disk_full(e) => StorageErrorKind::Full,
            Self::Commit(redb::CommitError::Storage(e)) if is_disk_full(e) => {
                StorageErrorKind::Full
            }
            Self::Serialization(_) => StorageErrorKind::Serialization,
            _ => StorageErrorKind::Unavailable,
        }
    }
}

fn is_disk_full(e: &redb::StorageError) -> bool {
    matches!(e, redb::StorageError::Io(err) if err.kind() == io::ErrorKind::StorageFull)
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Snapshot storage backed by redb
#[derive(Clone)]
pub struct SnapshotStore {
    db: Arc<Database>,
    quota: usize,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("quota", &self.quota)
            .finish_non_exhaustive()
    }
}

impl SnapshotStore {
    /// Open or create the database at the given path.
    ///
    /// `quota` caps the serialized size of a single snapshot.
    pub fn open(path: impl AsRef<Path>, quota: usize) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db, quota)
    }

    /// Open a store that lives only as long as this value (tests, throwaway sessions)
    pub fn open_in_memory(quota: usize) -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, quota)
    }

    fn init(db: Database, quota: usize) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            quota,
        })
    }

    fn storage_key(key: &str) -> String {
        format!("{SNAPSHOT_KEY_PREFIX}-{key}")
    }

    /// Write `records` under `key`, replacing any previous snapshot
    pub fn persist<T: Serialize>(&self, key: &str, records: &[T]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(records)?;
        if bytes.len() > self.quota {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: bytes.len(),
                limit: self.quota,
            });
        }

        let storage_key = Self::storage_key(key);
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
            table.insert(storage_key.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;

        tracing::debug!(key, bytes = bytes.len(), "Snapshot persisted");
        Ok(())
    }

    /// Read the snapshot stored under `key`; `None` when nothing was persisted
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        let storage_key = Self::storage_key(key);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(storage_key.as_str())? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Caller keys that currently hold a snapshot, in key order
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let prefix = format!("{SNAPSHOT_KEY_PREFIX}-");
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            if let Some(caller_key) = key.value().strip_prefix(&prefix) {
                keys.push(caller_key.to_string());
            }
        }
        Ok(keys)
    }
}
