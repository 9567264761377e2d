//! Room state, turn pipeline, and per-room scheduler for Tradewinds.
//!
//! This crate is the simulation engine proper: the [`room::Room`]
//! aggregate, the request-level operations (trade, travel, auctions,
//! modals), the fixed-order per-turn pipeline, the per-player view
//! builder, snapshot/restore records, configuration, and the
//! single-writer scheduler task that owns each room.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration with a YAML loader
//! - [`room`] -- The room aggregate and membership operations
//! - [`trade`] -- Buy/sell/refuel with maximal-feasible clamping
//! - [`travel`] -- The fuel-constrained travel state machine
//! - [`auction`] -- The facility and auction subsystem
//! - [`events`] -- Random events, offers, and delayed contracts
//! - [`tick`] -- The per-turn pipeline
//! - [`view`] -- The per-player view builder
//! - [`snapshot`] -- Disconnect and save/restore records
//! - [`scheduler`] -- The per-room single-writer task
//! - [`error`] -- Error types

pub mod auction;
pub mod config;
pub mod error;
pub mod events;
pub mod room;
pub mod scheduler;
pub mod snapshot;
pub mod tick;
pub mod trade;
pub mod travel;
pub mod view;

pub use config::{ConfigError, GameConfig};
pub use error::RoomError;
pub use room::Room;
pub use scheduler::{
    spawn_room, NoOpCallback, RoomCommand, RoomHandle, RoomMeta, TurnCallback,
};
pub use snapshot::{capture_room, restore_room, RoomSnapshot, SaveRecord};
pub use tick::{run_turn, TurnSummary};
