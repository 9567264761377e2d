//! Error types for the tradewinds-core crate.
//!
//! Most player-facing shortfalls never surface here -- trade operations
//! clamp to the maximal feasible amount instead of failing. These
//! errors cover room membership and lifecycle operations, where a
//! request genuinely cannot be honored.

use tradewinds_types::PlayerId;

/// Errors from room membership and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The player is not a member of this room.
    #[error("player not in room: {0}")]
    UnknownPlayer(PlayerId),

    /// The player is already a member of this room.
    #[error("player already in room: {0}")]
    AlreadyJoined(PlayerId),

    /// The game has already started and the player has no saved seat.
    #[error("game already started")]
    AlreadyStarted,

    /// The game has not started yet.
    #[error("game not started")]
    NotStarted,

    /// The room is at its player limit.
    #[error("room is full ({limit} players)")]
    RoomFull {
        /// The configured player limit.
        limit: u32,
    },
}
