//! Snapshot records for disconnect survival and save/restore.
//!
//! A [`PlayerSnapshot`] is the deep copy taken when a human leaves a
//! room (gracefully or by connection loss) and consumed on rejoin. A
//! [`RoomSnapshot`] captures the whole room; wrapped in a versioned
//! [`SaveRecord`] it is the opaque unit the store crate persists for
//! private rooms, restorable into a fresh room instance.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradewinds_types::{
    Auction, DelayedContract, MarketMemory, Modal, NewsItem, PlayerId, PlayerState, Transit,
};
use tradewinds_world::StarMap;

use crate::room::Room;

/// Version stamp written into every save record.
pub const SAVE_VERSION: u32 = 1;

/// A deep copy of one player's mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// The player's identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Whether the player is agent-controlled.
    pub is_bot: bool,
    /// Credits.
    pub money: i64,
    /// Docked or departure location.
    pub location: String,
    /// Chosen destination, if any.
    pub destination: Option<String>,
    /// Cargo hold contents.
    pub cargo: BTreeMap<tradewinds_types::Good, u32>,
    /// Weighted-average purchase cost per held good.
    pub avg_cost: BTreeMap<tradewinds_types::Good, i64>,
    /// Current fuel.
    pub fuel: u32,
    /// Cargo capacity bonus.
    pub cargo_bonus: u32,
    /// Speed bonus.
    pub speed_bonus: u32,
    /// Fuel capacity bonus.
    pub fuel_bonus: u32,
    /// In-progress movement, if any.
    pub transit: Option<Transit>,
    /// One-way insolvency flag.
    pub bankrupt: bool,
    /// Whether the player had voted to end the game.
    pub end_game: bool,
    /// Pending modal notifications.
    pub modals: Vec<Modal>,
    /// Action history.
    pub history: Vec<String>,
    /// Trading-agent memory, for bots.
    pub memory: Option<MarketMemory>,
}

impl PlayerSnapshot {
    /// Capture a deep copy of a player.
    pub fn capture(player: &PlayerState) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            is_bot: player.is_bot,
            money: player.money,
            location: player.location.clone(),
            destination: player.destination.clone(),
            cargo: player.cargo.clone(),
            avg_cost: player.avg_cost.clone(),
            fuel: player.fuel,
            cargo_bonus: player.cargo_bonus,
            speed_bonus: player.speed_bonus,
            fuel_bonus: player.fuel_bonus,
            transit: player.transit.clone(),
            bankrupt: player.bankrupt,
            end_game: player.end_game,
            modals: player.modals.iter().cloned().collect(),
            history: player.history.iter().cloned().collect(),
            memory: player.memory.clone(),
        }
    }

    /// Rebuild a live player from the snapshot.
    ///
    /// The restored player is disconnected and not ready; the scheduler
    /// flips the connected flag as the connection attaches.
    pub fn restore(&self) -> PlayerState {
        PlayerState {
            id: self.id,
            name: self.name.clone(),
            is_bot: self.is_bot,
            connected: false,
            money: self.money,
            location: self.location.clone(),
            destination: self.destination.clone(),
            cargo: self.cargo.clone(),
            avg_cost: self.avg_cost.clone(),
            fuel: self.fuel,
            cargo_bonus: self.cargo_bonus,
            speed_bonus: self.speed_bonus,
            fuel_bonus: self.fuel_bonus,
            transit: self.transit.clone(),
            bankrupt: self.bankrupt,
            ready: false,
            end_game: self.end_game,
            modals: self.modals.iter().cloned().collect(),
            history: self.history.iter().cloned().collect(),
            memory: self.memory.clone(),
        }
    }
}

/// A deep copy of an entire room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Room name.
    pub name: String,
    /// Privacy flag.
    pub private: bool,
    /// Owning player, for private rooms.
    pub owner: Option<PlayerId>,
    /// Whether the game had started.
    pub started: bool,
    /// Turn counter at capture time.
    pub turn: u64,
    /// Every player, live and persisted alike.
    pub players: Vec<PlayerSnapshot>,
    /// The star map with its full market state.
    pub map: StarMap,
    /// The active auction, if any.
    pub auction: Option<Auction>,
    /// Active news items.
    pub news: Vec<NewsItem>,
    /// Pending delayed contracts.
    pub contracts: Vec<DelayedContract>,
}

/// Capture the whole room: live players and persisted seats together.
pub fn capture_room(room: &Room) -> RoomSnapshot {
    let mut players: Vec<PlayerSnapshot> =
        room.players.values().map(PlayerSnapshot::capture).collect();
    players.extend(room.saved_players.values().cloned());
    RoomSnapshot {
        name: room.name.clone(),
        private: room.private,
        owner: room.owner,
        started: room.started,
        turn: room.turn,
        players,
        map: room.map.clone(),
        auction: room.auction.clone(),
        news: room.news.clone(),
        contracts: room.contracts.clone(),
    }
}

/// Rebuild a fresh room instance from a snapshot.
///
/// The room gets a new identity; humans come back as persisted seats
/// awaiting rejoin, bots come back live.
pub fn restore_room(snapshot: &RoomSnapshot) -> Room {
    let mut room = Room::new(snapshot.name.clone(), snapshot.private, snapshot.owner);
    room.started = snapshot.started;
    room.turn = snapshot.turn;
    room.map = snapshot.map.clone();
    room.auction = snapshot.auction.clone();
    room.news = snapshot.news.clone();
    room.contracts = snapshot.contracts.clone();
    for player in &snapshot.players {
        if player.is_bot {
            room.players.insert(player.id, player.restore());
        } else {
            room.saved_players.insert(player.id, player.clone());
        }
    }
    room
}

/// The opaque, versioned record handed to the save store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Format version.
    pub version: u32,
    /// The identity the save belongs to.
    pub owner: PlayerId,
    /// Wall-clock capture time.
    pub saved_at: DateTime<Utc>,
    /// The room at its latest completed turn.
    pub room: RoomSnapshot,
}

impl SaveRecord {
    /// Wrap the room's current state in a save record for `owner`.
    pub fn capture(owner: PlayerId, room: &Room) -> Self {
        Self {
            version: SAVE_VERSION,
            owner,
            saved_at: Utc::now(),
            room: capture_room(room),
        }
    }

    /// A best-effort default used when a stored record cannot be
    /// parsed: a fresh, unstarted private room for the same owner.
    pub fn fallback(owner: PlayerId) -> Self {
        let room = Room::new(String::from("Restored game"), true, Some(owner));
        Self {
            version: SAVE_VERSION,
            owner,
            saved_at: Utc::now(),
            room: capture_room(&room),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradewinds_types::Good;

    use crate::config::GameConfig;

    use super::*;

    #[test]
    fn player_round_trip_is_exact() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let id = PlayerId::new();
        room.add_player(id, String::from("Ada"), &cfg).unwrap();
        if let Some(p) = room.players.get_mut(&id) {
            p.money = -120;
            p.fuel = 9;
            p.cargo.insert(Good::Medicine, 4);
            p.avg_cost.insert(Good::Medicine, 75);
            p.destination = Some(String::from("Samsara"));
            p.transit = Some(Transit {
                origin: String::from("New Ceres"),
                remaining: 20,
                total: 35,
            });
        }
        let before = room.players.get(&id).cloned().unwrap();
        let snapshot = PlayerSnapshot::capture(&before);
        let after = snapshot.restore();

        assert_eq!(after.money, before.money);
        assert_eq!(after.location, before.location);
        assert_eq!(after.cargo, before.cargo);
        assert_eq!(after.fuel, before.fuel);
        assert_eq!(after.transit, before.transit);
    }

    #[test]
    fn room_snapshot_survives_json() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), true, None);
        let id = PlayerId::new();
        room.owner = Some(id);
        room.add_player(id, String::from("Ada"), &cfg).unwrap();
        let _ = room.add_bot(&cfg).unwrap();
        room.turn = 17;

        let record = SaveRecord::capture(id, &room);
        let json = serde_json::to_string(&record).unwrap();
        let back: SaveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn restore_builds_a_fresh_room() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), true, None);
        let id = PlayerId::new();
        room.add_player(id, String::from("Ada"), &cfg).unwrap();
        let bot = room.add_bot(&cfg).unwrap();
        room.turn = 4;

        let snapshot = capture_room(&room);
        let restored = restore_room(&snapshot);

        assert_ne!(restored.id, room.id);
        assert_eq!(restored.turn, 4);
        // The bot is live again; the human waits as a saved seat.
        assert!(restored.players.contains_key(&bot));
        assert!(restored.saved_players.contains_key(&id));
    }
}
