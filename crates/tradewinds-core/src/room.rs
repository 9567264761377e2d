//! The room aggregate: players, market, auction, news, and contracts.
//!
//! A [`Room`] is owned outright by its scheduler task; nothing outside
//! that task ever holds a reference to it. All membership and
//! bookkeeping operations live here; the per-turn pipeline is in
//! [`tick`], and request-level operations in [`trade`], [`travel`],
//! [`auction`], and [`events`].
//!
//! [`tick`]: crate::tick
//! [`trade`]: crate::trade
//! [`travel`]: crate::travel
//! [`auction`]: crate::auction
//! [`events`]: crate::events

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tradewinds_agents::player;
use tradewinds_types::{
    Auction, DelayedContract, ModalPayload, NewsItem, PlayerId, PlayerState, RoomId,
};
use tradewinds_world::{create_starting_map, StarMap};

use crate::config::GameConfig;
use crate::error::RoomError;
use crate::snapshot::PlayerSnapshot;

/// Names handed out to bots, in order.
const BOT_NAMES: [&str; 8] = [
    "Vex", "Juno", "Halloran", "Mirela", "Oberon", "Sable", "Quint", "Ysolde",
];

/// One isolated game instance with its own players, market, and turn
/// clock.
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identity.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Private rooms are unlisted and saved every turn for their owner.
    pub private: bool,
    /// The creating player, for private-room save ownership.
    pub owner: Option<PlayerId>,
    /// Whether the game has started.
    pub started: bool,
    /// Whether the game is paused.
    pub paused: bool,
    /// Turn counter; advances by exactly one per scheduler cycle.
    pub turn: u64,
    /// Wall-clock deadline of the current turn.
    pub turn_deadline: Option<DateTime<Utc>>,
    /// All players keyed by identity.
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// The star map and its market state.
    pub map: StarMap,
    /// The active auction, if any. At most one per room.
    pub auction: Option<Auction>,
    /// Active news items.
    pub news: Vec<NewsItem>,
    /// Pending delayed covert contracts.
    pub contracts: Vec<DelayedContract>,
    /// Disconnect-persisted players awaiting rejoin.
    pub saved_players: BTreeMap<PlayerId, PlayerSnapshot>,
}

impl Room {
    /// Create a fresh room on the starting map.
    pub fn new(name: String, private: bool, owner: Option<PlayerId>) -> Self {
        Self {
            id: RoomId::new(),
            name,
            private,
            owner,
            started: false,
            paused: false,
            turn: 0,
            turn_deadline: None,
            players: BTreeMap::new(),
            map: create_starting_map(),
            auction: None,
            news: Vec::new(),
            contracts: Vec::new(),
            saved_players: BTreeMap::new(),
        }
    }

    /// The location every new player starts at.
    fn starting_location(&self) -> String {
        self.map.names().first().cloned().unwrap_or_default()
    }

    /// Add a human player.
    ///
    /// A player with a saved seat rejoins through [`Room::rejoin`]
    /// instead. Joining an already started room without a saved seat is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError`] if the player is already in the room, the
    /// room is full, or the game has started.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: String,
        cfg: &GameConfig,
    ) -> Result<(), RoomError> {
        if self.players.contains_key(&id) {
            return Err(RoomError::AlreadyJoined(id));
        }
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }
        let limit = cfg.rules.max_players;
        if self.player_count() >= limit {
            return Err(RoomError::RoomFull { limit });
        }
        let player = player::new_player(
            id,
            name,
            false,
            cfg.rules.starting_money,
            self.starting_location(),
            cfg.rules.starting_fuel,
        );
        self.players.insert(id, player);
        Ok(())
    }

    /// Add a bot player.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomFull`] if the room is at its limit.
    pub fn add_bot(&mut self, cfg: &GameConfig) -> Result<PlayerId, RoomError> {
        let limit = cfg.rules.max_players;
        if self.player_count() >= limit {
            return Err(RoomError::RoomFull { limit });
        }
        let taken: Vec<&str> = self.players.values().map(|p| p.name.as_str()).collect();
        let name = BOT_NAMES
            .iter()
            .find(|n| !taken.contains(n))
            .copied()
            .unwrap_or("Drifter");
        let id = PlayerId::new();
        let bot = player::new_player(
            id,
            String::from(name),
            true,
            cfg.rules.starting_money,
            self.starting_location(),
            cfg.rules.starting_fuel,
        );
        self.players.insert(id, bot);
        Ok(id)
    }

    /// Remove a human player, persisting a snapshot for rejoin.
    ///
    /// This is the single path for both graceful exit and connection
    /// loss; the two are indistinguishable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::UnknownPlayer`] if the player is not here.
    pub fn persist_and_remove(&mut self, id: PlayerId) -> Result<(), RoomError> {
        let player = self
            .players
            .remove(&id)
            .ok_or(RoomError::UnknownPlayer(id))?;
        if !player.is_bot {
            self.saved_players.insert(id, PlayerSnapshot::capture(&player));
        }
        Ok(())
    }

    /// Restore a previously persisted player into the room.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::UnknownPlayer`] if no snapshot exists.
    pub fn rejoin(&mut self, id: PlayerId) -> Result<(), RoomError> {
        let snapshot = self
            .saved_players
            .remove(&id)
            .ok_or(RoomError::UnknownPlayer(id))?;
        let mut player = snapshot.restore();
        player.connected = true;
        self.players.insert(id, player);
        Ok(())
    }

    /// Start the game.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::AlreadyStarted`] if already started.
    pub fn start(&mut self, cfg: &GameConfig) -> Result<(), RoomError> {
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }
        self.started = true;
        self.set_deadline(cfg);
        Ok(())
    }

    /// Reset the turn deadline from the configured turn length.
    pub fn set_deadline(&mut self, cfg: &GameConfig) {
        let seconds = i64::try_from(cfg.rules.turn_seconds).unwrap_or(i64::MAX);
        self.turn_deadline = Some(
            Utc::now()
                .checked_add_signed(chrono::Duration::seconds(seconds))
                .unwrap_or_else(Utc::now),
        );
    }

    /// Total player count (humans and bots).
    pub fn player_count(&self) -> u32 {
        u32::try_from(self.players.len()).unwrap_or(u32::MAX)
    }

    /// Whether no connected human remains (bot-only pacing applies).
    pub fn bots_only(&self) -> bool {
        !self.players.values().any(|p| !p.is_bot && p.connected)
    }

    /// Whether every connected human has marked ready.
    ///
    /// `false` when no connected human exists (bot-only rooms pace on
    /// the poll interval instead).
    pub fn all_humans_ready(&self) -> bool {
        let mut any = false;
        for p in self.players.values() {
            if p.is_bot || !p.connected {
                continue;
            }
            any = true;
            if !p.ready {
                return false;
            }
        }
        any
    }

    /// Whether every connected human has voted to end the game.
    pub fn end_game_agreed(&self) -> bool {
        let mut any = false;
        for p in self.players.values() {
            if p.is_bot || !p.connected {
                continue;
            }
            any = true;
            if !p.end_game {
                return false;
            }
        }
        any
    }

    /// Clear every human's ready flag (start of each turn).
    pub fn reset_ready(&mut self) {
        for p in self.players.values_mut() {
            if !p.is_bot {
                p.ready = false;
            }
        }
    }

    /// Why a player cannot act right now, if anything.
    pub fn action_block(&self, id: PlayerId) -> Option<&'static str> {
        let player = self.players.get(&id)?;
        if player.bankrupt {
            return Some("you are bankrupt and can only observe");
        }
        if player.transit.is_some() {
            return Some("you are in transit between planets");
        }
        None
    }

    /// Push a room-wide news item with no market effect.
    pub fn emit_news(&mut self, headline: impl Into<String>, location: impl Into<String>) {
        self.news.push(NewsItem {
            headline: headline.into(),
            location: location.into(),
            good: None,
            price_delta: None,
            production_delta: None,
            fuel_delta: None,
            turns_remaining: 3,
        });
    }

    /// Charge a player, handling the bankruptcy transition: the Game
    /// Over modal and the room-wide news item are emitted exactly once.
    ///
    /// Returns `true` if this charge bankrupted the player.
    pub fn charge_player(&mut self, id: PlayerId, amount: i64, cfg: &GameConfig) -> bool {
        let Some(p) = self.players.get_mut(&id) else {
            return false;
        };
        let outcome = player::charge(p, amount, cfg.rules.debt_floor);
        if !outcome.bankrupted {
            return false;
        }
        let name = p.name.clone();
        let location = p.location.clone();
        player::push_modal(
            p,
            "Game Over",
            "Your debts have crushed you. You may keep watching the galaxy go by.",
            ModalPayload::Plain,
        );
        tracing::info!(room = %self.id, player = %name, "player went bankrupt");
        self.emit_news(format!("{name} declared bankrupt; creditors seize assets"), location);
        true
    }
}
