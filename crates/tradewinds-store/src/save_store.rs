//! Save-record storage for private rooms.
//!
//! Records are opaque versioned JSON blobs keyed by the owning player's
//! identity. The store never interprets the room inside a record; it
//! only moves bytes. A record that cannot be parsed on load produces a
//! logged best-effort fallback instead of an error, so a corrupt save
//! can never lock a player out.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tradewinds_core::SaveRecord;
use tradewinds_types::PlayerId;

use crate::error::StoreError;

/// Storage for private-room save records.
pub trait SaveStore: Send + Sync {
    /// Persist the record for its owner, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be written.
    fn save(&self, record: &SaveRecord) -> Result<(), StoreError>;

    /// Load the owner's record, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if a record exists but cannot be
    /// parsed, or [`StoreError::Io`] on filesystem failure.
    fn load(&self, owner: PlayerId) -> Result<Option<SaveRecord>, StoreError>;

    /// Remove the owner's record. Removing a missing record is fine.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    fn delete(&self, owner: PlayerId) -> Result<(), StoreError>;

    /// Load with best-effort recovery: a missing record is `None`, a
    /// corrupt or unreadable record becomes a logged fallback so the
    /// owner can still play.
    fn load_or_fallback(&self, owner: PlayerId) -> Option<SaveRecord> {
        match self.load(owner) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(%owner, %err, "save record unusable, restoring a fresh room");
                Some(SaveRecord::fallback(owner))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// An in-memory store, used in tests and for rooms that should not
/// outlive the process.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    /// Serialized records keyed by owner.
    records: Mutex<BTreeMap<PlayerId, String>>,
}

impl MemorySaveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&self, record: &SaveRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)
            .map_err(|source| StoreError::Serialize { source })?;
        if let Ok(mut records) = self.records.lock() {
            records.insert(record.owner, json);
        }
        Ok(())
    }

    fn load(&self, owner: PlayerId) -> Result<Option<SaveRecord>, StoreError> {
        let json = self
            .records
            .lock()
            .ok()
            .and_then(|records| records.get(&owner).cloned());
        let Some(json) = json else {
            return Ok(None);
        };
        let record =
            serde_json::from_str(&json).map_err(|source| StoreError::Corrupt { source })?;
        Ok(Some(record))
    }

    fn delete(&self, owner: PlayerId) -> Result<(), StoreError> {
        if let Ok(mut records) = self.records.lock() {
            records.remove(&owner);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// A JSON-file store: one file per owner under a configured directory.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    /// Directory the record files live in.
    dir: PathBuf,
}

impl FileSaveStore {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The record path for one owner.
    fn path_for(&self, owner: PlayerId) -> PathBuf {
        self.dir.join(format!("{owner}.json"))
    }
}

impl SaveStore for FileSaveStore {
    fn save(&self, record: &SaveRecord) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(record)
            .map_err(|source| StoreError::Serialize { source })?;
        let path = self.path_for(record.owner);
        std::fs::write(&path, json)?;
        tracing::debug!(owner = %record.owner, path = %path.display(), turn = record.room.turn, "room saved");
        Ok(())
    }

    fn load(&self, owner: PlayerId) -> Result<Option<SaveRecord>, StoreError> {
        let path = self.path_for(owner);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io { source: err }),
        };
        let record =
            serde_json::from_str(&json).map_err(|source| StoreError::Corrupt { source })?;
        Ok(Some(record))
    }

    fn delete(&self, owner: PlayerId) -> Result<(), StoreError> {
        let path = self.path_for(owner);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io { source: err }),
        }
    }
}
