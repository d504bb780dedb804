/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Snapshot persistence using redb (key-value snapshots) + serde_json.
//!
//! Architecture:
//! - The full board serializes to one JSON document under a single key
//! - `SnapshotStore` fronts a [`KeyValueStore`] backend; the disk backend is
//!   redb, tests inject an in-memory map
//! - A storage failure degrades the store to memory-only: it warns once,
//!   drops the backend, and every later call becomes a no-op
//!
//! A snapshot that fails validation on load is reported as
//! [`LoadOutcome::Malformed`] so the caller can fall back to defaults instead
//! of running on a half-parsed board.

use log::{debug, warn};
use redb::ReadableDatabase;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::model::{Edge, Node, NodeId};

const SNAPSHOT_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("snapshots");

/// The single key the board snapshot lives under.
pub const SNAPSHOT_KEY: &str = "my-rfs";

/// Minimal string-keyed byte store the snapshot layer runs against.
///
/// Absence is not an error: `get` on a key never written returns `Ok(None)`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Disk backend: one redb database file per board directory.
pub struct RedbStore {
    db: redb::Database,
}

impl RedbStore {
    pub fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create dir: {e}")))?;

        let db = redb::Database::create(base_dir.join("snapshots.redb"))
            .map_err(|e| StoreError::Redb(format!("{e}")))?;

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        let table = match read_txn.open_table(SNAPSHOT_TABLE) {
            Ok(table) => table,
            // Reading before the first write: the table does not exist yet.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(StoreError::Redb(format!("{e}"))),
        };
        let entry = table
            .get(key)
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        Ok(entry.map(|guard| guard.value().to_vec()))
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
            table
                .remove(key)
                .map_err(|e| StoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Redb(format!("{e}")))?;
        Ok(())
    }
}

/// Process-local backend for boards that never touch disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// The persisted board: full node and edge collections, nothing else.
/// Active-node state is derived, not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// What a load attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A well-formed snapshot.
    Snapshot(Snapshot),
    /// Nothing stored under the key (or storage is unavailable).
    Missing,
    /// Stored bytes exist but failed parsing or validation.
    Malformed,
}

/// Snapshot store for one board.
///
/// `storage: None` is degraded mode: the store already warned about the
/// failure and silently drops every later save/load/clear.
pub struct SnapshotStore {
    storage: Option<Box<dyn KeyValueStore>>,
}

impl SnapshotStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Open the redb backend under the platform config directory.
    pub fn open_default() -> Self {
        Self::open_at(Self::default_data_dir())
    }

    /// Open the redb backend under `base_dir`; on failure the store starts
    /// degraded instead of erroring.
    pub fn open_at(base_dir: PathBuf) -> Self {
        match RedbStore::open(base_dir) {
            Ok(store) => Self::new(Box::new(store)),
            Err(e) => {
                warn!("Snapshot storage unavailable: {e}; continuing memory-only");
                Self { storage: None }
            },
        }
    }

    pub fn default_data_dir() -> PathBuf {
        let mut dir = dirs::config_dir().expect("No config directory available");
        dir.push("flowboard");
        dir
    }

    /// True once a storage failure has dropped the backend.
    pub fn is_degraded(&self) -> bool {
        self.storage.is_none()
    }

    /// Write the snapshot under [`SNAPSHOT_KEY`].
    ///
    /// A serialization failure warns and keeps the backend; a storage
    /// failure degrades the store.
    pub fn save(&mut self, snapshot: &Snapshot) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };

        let bytes = match serde_json::to_vec(snapshot) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize snapshot: {e}");
                return;
            },
        };

        if let Err(e) = storage.set(SNAPSHOT_KEY, &bytes) {
            self.degrade("write", e);
            return;
        }

        debug!(
            "Saved snapshot: {} nodes, {} edges",
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
    }

    /// Read and validate the snapshot under [`SNAPSHOT_KEY`].
    pub fn load(&mut self) -> LoadOutcome {
        let Some(storage) = self.storage.as_ref() else {
            return LoadOutcome::Missing;
        };

        let bytes = match storage.get(SNAPSHOT_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return LoadOutcome::Missing,
            Err(e) => {
                self.degrade("read", e);
                return LoadOutcome::Missing;
            },
        };

        let snapshot: Snapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Rejecting malformed snapshot: {e}");
                return LoadOutcome::Malformed;
            },
        };

        if let Some(id) = first_duplicate_node_id(&snapshot.nodes) {
            warn!("Rejecting malformed snapshot: duplicate node id {id}");
            return LoadOutcome::Malformed;
        }

        debug!(
            "Loaded snapshot: {} nodes, {} edges",
            snapshot.nodes.len(),
            snapshot.edges.len()
        );
        LoadOutcome::Snapshot(snapshot)
    }

    /// Delete the stored snapshot.
    pub fn clear(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };

        if let Err(e) = storage.delete(SNAPSHOT_KEY) {
            self.degrade("delete", e);
        }
    }

    fn degrade(&mut self, operation: &str, e: StoreError) {
        warn!("Snapshot {operation} failed: {e}; continuing memory-only");
        self.storage = None;
    }
}

fn first_duplicate_node_id(nodes: &[Node]) -> Option<&NodeId> {
    let mut seen = HashSet::new();
    nodes.iter().map(|node| &node.id).find(|id| !seen.insert(*id))
}

/// Errors from the snapshot backends
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Redb(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {e}"),
            StoreError::Redb(e) => write!(f, "Redb error: {e}"),
        }
    }
}
