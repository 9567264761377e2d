//! Per-player filtered view payloads.
//!
//! The view is the only projection of room state that ever leaves the
//! room's scheduler task: a room summary everyone shares, the requesting
//! player's own full detail, the detail of the location they can see,
//! and at most one pending modal. Other players' cargo, money, and
//! memory are never included (fog of war).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::Good;
use crate::ids::{AuctionId, PlayerId, RoomId};
use crate::structs::{Facility, Modal, NewsItem, Transit};

/// Public facts about a player, visible to everyone in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublic {
    /// The player's identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Whether the player is agent-controlled.
    pub is_bot: bool,
    /// Whether a connection is attached.
    pub connected: bool,
    /// Docked location; `None` while the player is in transit.
    pub location: Option<String>,
    /// One-way insolvency flag.
    pub bankrupt: bool,
    /// Whether the player has marked ready this turn.
    pub ready: bool,
}

/// The requesting player's own full detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    /// The player's identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Credits (signed; negative is debt).
    pub money: i64,
    /// Current or departure location.
    pub location: String,
    /// Chosen destination, if any.
    pub destination: Option<String>,
    /// Cargo hold contents.
    pub cargo: BTreeMap<Good, u32>,
    /// Weighted-average purchase cost per held good.
    pub avg_cost: BTreeMap<Good, i64>,
    /// Current fuel.
    pub fuel: u32,
    /// Effective cargo capacity including upgrades.
    pub cargo_capacity: u32,
    /// Effective fuel capacity including upgrades.
    pub fuel_capacity: u32,
    /// Effective speed including upgrades.
    pub speed: u32,
    /// In-progress movement, if any.
    pub transit: Option<Transit>,
    /// One-way insolvency flag.
    pub bankrupt: bool,
    /// Whether the player has voted to end the game.
    pub end_game: bool,
    /// Recent action history, oldest first.
    pub history: Vec<String>,
}

/// Market detail of a location the player can currently see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    /// Location name.
    pub name: String,
    /// Stock per good.
    pub stock: BTreeMap<Good, u32>,
    /// Price per good.
    pub prices: BTreeMap<Good, i64>,
    /// Current fuel price.
    pub fuel_price: i64,
    /// Facilities attached to the location.
    pub facilities: Vec<Facility>,
}

/// The auction as one player sees it: everyone sees the terms and the
/// countdown, but only their own standing bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionView {
    /// Auction identity.
    pub id: AuctionId,
    /// Display name of the facility archetype.
    pub facility: String,
    /// The location the facility will attach to.
    pub location: String,
    /// The usage charge the facility will levy.
    pub usage_charge: i64,
    /// Suggested opening bid.
    pub suggested_bid: i64,
    /// Turns until the auction resolves.
    pub turns_remaining: u32,
    /// The requesting player's standing bid, if any.
    pub your_bid: Option<i64>,
}

/// Shared, non-secret facts about the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room identity.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Whether the game has started.
    pub started: bool,
    /// Whether the game is paused.
    pub paused: bool,
    /// Current turn counter.
    pub turn: u64,
    /// Wall-clock deadline of the current turn (RFC 3339).
    pub turn_deadline: Option<String>,
    /// Public facts about every player.
    pub players: Vec<PlayerPublic>,
}

/// The complete per-player view pushed after every state-affecting
/// operation and every turn tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Shared room facts.
    pub room: RoomSummary,
    /// The requesting player's own detail.
    pub you: PlayerDetail,
    /// The location the player can currently see, if docked.
    pub location: Option<LocationView>,
    /// Active news items.
    pub news: Vec<NewsItem>,
    /// The active auction, if any.
    pub auction: Option<AuctionView>,
    /// The oldest pending modal, if any.
    pub modal: Option<Modal>,
}

/// One row of the public room listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfo {
    /// Room identity.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Whether the room is private (save/restore enabled, unlisted).
    pub private: bool,
    /// Whether the game has started.
    pub started: bool,
    /// Number of players currently in the room.
    pub players: u32,
    /// Current turn counter.
    pub turn: u64,
}
