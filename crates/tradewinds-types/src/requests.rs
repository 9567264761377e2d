//! The typed request/response catalogue exchanged with the transport layer.
//!
//! Inbound frames deserialize into [`ClientRequest`] -- a tagged union
//! with one variant per request kind, so dispatch is exhaustive and the
//! payload fields are statically known per kind. Structurally malformed
//! frames simply fail to deserialize and are ignored by the connection
//! loop. Outbound traffic is a [`ServerMessage`].

use serde::{Deserialize, Serialize};

use crate::enums::Good;
use crate::ids::{AuctionId, ModalId, PlayerId, RoomId};
use crate::view::{PlayerPublic, PlayerView, RoomInfo};

/// A typed inbound request from one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientRequest {
    /// Establish the player identity for this connection.
    #[serde(rename_all = "camelCase")]
    Connect {
        /// Display name to play under.
        name: String,
    },
    /// List joinable rooms.
    ListRooms,
    /// Create a new room and join it.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        /// Room name.
        name: String,
        /// Unlisted room with per-turn save/restore, owned by the creator.
        #[serde(default)]
        private: bool,
    },
    /// Join an existing room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        /// The room to join.
        room_id: RoomId,
    },
    /// Leave the current room (state is persisted for rejoin).
    ExitRoom,
    /// Restore the caller's saved private room into a fresh instance.
    RestoreRoom,
    /// Start the game in the current room.
    StartGame,
    /// Add a trading-agent player to the current room.
    AddBot,
    /// Mark or unmark this player ready to end the turn early.
    #[serde(rename_all = "camelCase")]
    SetReady {
        /// The new ready state.
        ready: bool,
    },
    /// Vote for or against ending the game.
    #[serde(rename_all = "camelCase")]
    SetEndGame {
        /// The new end-game vote.
        end_game: bool,
    },
    /// Pause or resume the room's turn clock.
    #[serde(rename_all = "camelCase")]
    SetPaused {
        /// The new paused state.
        paused: bool,
    },
    /// Choose a travel destination.
    #[serde(rename_all = "camelCase")]
    SelectPlanet {
        /// Destination location name.
        destination: String,
    },
    /// Buy a good at the docked location.
    #[serde(rename_all = "camelCase")]
    Buy {
        /// The good to buy.
        good: Good,
        /// Requested amount; clamped to what stock, capacity, and funds allow.
        amount: u32,
    },
    /// Sell a good at the docked location.
    #[serde(rename_all = "camelCase")]
    Sell {
        /// The good to sell.
        good: Good,
        /// Requested amount; clamped to the held quantity.
        amount: u32,
    },
    /// Buy fuel at the docked location.
    #[serde(rename_all = "camelCase")]
    Refuel {
        /// Requested units; clamped to capacity and funds.
        amount: u32,
    },
    /// Place or raise a bid in the active auction.
    #[serde(rename_all = "camelCase")]
    AuctionBid {
        /// The auction being bid on.
        auction_id: AuctionId,
        /// Bid amount in credits.
        bid: i64,
    },
    /// Acknowledge a plain modal.
    #[serde(rename_all = "camelCase")]
    AckModal {
        /// The modal being acknowledged.
        id: ModalId,
    },
    /// Accept or decline an offer modal.
    #[serde(rename_all = "camelCase")]
    RespondModal {
        /// The modal being answered.
        id: ModalId,
        /// `true` to accept the offer.
        accept: bool,
    },
    /// Request public info about another player.
    #[serde(rename_all = "camelCase")]
    GetPlayer {
        /// The player being queried.
        player_id: PlayerId,
    },
}

/// A typed outbound message to one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Identity confirmation after `connect`.
    #[serde(rename_all = "camelCase")]
    Welcome {
        /// The identity assigned to this connection.
        player_id: PlayerId,
        /// The display name in effect.
        name: String,
    },
    /// The per-player filtered state snapshot.
    View(Box<PlayerView>),
    /// The joinable room listing.
    #[serde(rename_all = "camelCase")]
    RoomList {
        /// One row per listed room.
        rooms: Vec<RoomInfo>,
    },
    /// Public info about a queried player.
    PlayerInfo(PlayerPublic),
    /// A confirmation or rejection explanation for the last request.
    #[serde(rename_all = "camelCase")]
    Notice {
        /// Human-readable message.
        message: String,
        /// Whether the request was rejected.
        error: bool,
    },
}
