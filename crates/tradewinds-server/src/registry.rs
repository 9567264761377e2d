//! The room registry: the only shared mutable state in the server.
//!
//! Rooms are independent tasks; the registry maps room ids to their
//! handles behind a read/write lock used for lookups, insertion, and
//! removal only -- never across an await on room work. Closing a room
//! is idempotent, and a replaced task is awaited with a short grace
//! timeout so two schedulers never mutate the same room's successor
//! concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tradewinds_core::scheduler::{RoomCommand, RoomHandle, TurnCallback};
use tradewinds_core::{restore_room, GameConfig, NoOpCallback, Room, SaveRecord, TurnSummary};
use tradewinds_store::SaveStore;
use tradewinds_types::{PlayerId, RoomId, RoomInfo};

/// Grace period a closing room's task is awaited for before its
/// replacement may start.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// One registered room: the external handle plus the task to await on
/// close.
struct RoomEntry {
    handle: RoomHandle,
    task: tokio::task::JoinHandle<()>,
}

/// Persists a private room after every turn and on close.
struct SaveCallback {
    store: Arc<dyn SaveStore>,
    owner: PlayerId,
}

impl TurnCallback for SaveCallback {
    fn on_turn(&mut self, room: &Room, summary: &TurnSummary) {
        let record = SaveRecord::capture(self.owner, room);
        if let Err(err) = self.store.save(&record) {
            tracing::warn!(room = %room.id, turn = summary.turn, %err, "autosave failed");
        }
    }

    fn on_close(&mut self, room: &Room) {
        let record = SaveRecord::capture(self.owner, room);
        if let Err(err) = self.store.save(&record) {
            tracing::warn!(room = %room.id, %err, "final save failed");
        }
    }
}

/// The shared room registry.
pub struct Registry {
    rooms: RwLock<BTreeMap<RoomId, RoomEntry>>,
    cfg: Arc<GameConfig>,
    store: Arc<dyn SaveStore>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new(cfg: Arc<GameConfig>, store: Arc<dyn SaveStore>) -> Self {
        Self {
            rooms: RwLock::new(BTreeMap::new()),
            cfg,
            store,
        }
    }

    /// Create and register a new room, returning its handle.
    pub async fn create_room(
        &self,
        name: String,
        private: bool,
        owner: Option<PlayerId>,
    ) -> RoomHandle {
        let room = Room::new(name, private, owner);
        self.register(room).await
    }

    /// Restore the owner's saved private room into a fresh instance.
    ///
    /// `None` if the owner has no saved record at all. An unparseable
    /// record restores to a logged fallback room instead of failing.
    pub async fn restore_saved(&self, owner: PlayerId) -> Option<RoomHandle> {
        let record = self.store.load_or_fallback(owner)?;
        let room = restore_room(&record.room);
        tracing::info!(%owner, room = %room.id, turn = room.turn, "restored saved room");
        Some(self.register(room).await)
    }

    /// Spawn and track a room task.
    async fn register(&self, room: Room) -> RoomHandle {
        let callback: Box<dyn TurnCallback> = match (room.private, room.owner) {
            (true, Some(owner)) => Box::new(SaveCallback {
                store: Arc::clone(&self.store),
                owner,
            }),
            _ => Box::new(NoOpCallback),
        };
        let (handle, task) = tradewinds_core::spawn_room(room, Arc::clone(&self.cfg), callback);
        let mut rooms = self.rooms.write().await;
        rooms.insert(handle.id, RoomEntry { handle: handle.clone(), task });
        handle
    }

    /// Look up a room's handle, sweeping it out if its task has ended.
    pub async fn get(&self, id: RoomId) -> Option<RoomHandle> {
        {
            let rooms = self.rooms.read().await;
            match rooms.get(&id) {
                Some(entry) if !entry.task.is_finished() => return Some(entry.handle.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // The task ended on its own (room emptied); drop the entry.
        let mut rooms = self.rooms.write().await;
        rooms.remove(&id);
        None
    }

    /// List public rooms, sweeping entries whose tasks have ended.
    pub async fn list(&self) -> Vec<RoomInfo> {
        let mut finished = Vec::new();
        let listing = {
            let rooms = self.rooms.read().await;
            rooms
                .iter()
                .filter_map(|(id, entry)| {
                    if entry.task.is_finished() {
                        finished.push(*id);
                        return None;
                    }
                    if entry.handle.meta.private {
                        return None;
                    }
                    Some(entry.handle.meta.info(*id))
                })
                .collect()
        };
        if !finished.is_empty() {
            let mut rooms = self.rooms.write().await;
            for id in finished {
                rooms.remove(&id);
            }
        }
        listing
    }

    /// Number of live rooms.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Close a room and wait (briefly) for its task to exit.
    ///
    /// Idempotent: closing an unknown or already-closed room is a
    /// no-op.
    pub async fn close_room(&self, id: RoomId) {
        let entry = {
            let mut rooms = self.rooms.write().await;
            rooms.remove(&id)
        };
        let Some(entry) = entry else {
            return;
        };
        entry.handle.send(RoomCommand::Close);
        if tokio::time::timeout(CLOSE_GRACE, entry.task).await.is_err() {
            tracing::warn!(room = %id, "room task outlived the close grace period");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradewinds_store::MemorySaveStore;

    use super::*;

    fn registry() -> Registry {
        Registry::new(
            Arc::new(GameConfig::default()),
            Arc::new(MemorySaveStore::new()),
        )
    }

    #[tokio::test]
    async fn create_list_close() {
        let registry = registry();
        let handle = registry
            .create_room(String::from("alpha"), false, None)
            .await;
        assert_eq!(registry.list().await.len(), 1);
        assert!(registry.get(handle.id).await.is_some());

        registry.close_room(handle.id).await;
        assert!(registry.get(handle.id).await.is_none());
        assert!(registry.list().await.is_empty());
        // Closing again is a no-op.
        registry.close_room(handle.id).await;
    }

    #[tokio::test]
    async fn private_rooms_are_unlisted() {
        let registry = registry();
        let owner = PlayerId::new();
        let handle = registry
            .create_room(String::from("mine"), true, Some(owner))
            .await;
        assert!(registry.list().await.is_empty());
        assert!(registry.get(handle.id).await.is_some());
        registry.close_room(handle.id).await;
    }

    #[tokio::test]
    async fn restore_with_no_record_is_none() {
        let registry = registry();
        assert!(registry.restore_saved(PlayerId::new()).await.is_none());
    }
}
