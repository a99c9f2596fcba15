//! # Snapshot Store
//! Persists the single most-recent calendar snapshot.
//!
//! The store holds at most one logical record; `save` replaces it whole.
//! A reader must observe either the previous snapshot or the new one,
//! never a mixture of the two.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::calendar::types::Snapshot;
use crate::error::StoreError;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Atomically replace the stored snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
    /// The current snapshot, or `None` if nothing has ever been saved.
    async fn latest(&self) -> Result<Option<Snapshot>, StoreError>;
}

/// Volatile single-slot store. The whole value is swapped under the lock,
/// which is what gives readers the no-torn-snapshot guarantee.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.slot.write().expect("snapshot slot poisoned") = Some(snapshot.clone());
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.slot.read().expect("snapshot slot poisoned").clone())
    }
}

/// Durable single-record store: one JSON file holding the event list and its
/// capture timestamp. Survives process restarts.
///
/// Writes land in a sibling temp file first and are then renamed over the
/// target, so a concurrent reader sees either the old file or the new one.
pub struct FileStore {
    path: PathBuf,
    write_gate: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: tokio::sync::Mutex::new(()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut p = self.path.clone().into_os_string();
        p.push(".tmp");
        PathBuf::from(p)
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let _guard = self.write_gate.lock().await;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Snapshot>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}
