//! Shared type definitions for the Tradewinds trading-simulation server.
//!
//! This crate is the single source of truth for the types used across the
//! Tradewinds workspace: identifiers, enumerations, entity records, the
//! typed request/response catalogue, and the per-player view payloads.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Goods, facility archetypes, upgrade kinds
//! - [`structs`] -- Core entity structs (players, locations, auctions, news)
//! - [`requests`] -- Inbound/outbound message catalogue
//! - [`view`] -- Per-player filtered view payloads

pub mod enums;
pub mod ids;
pub mod requests;
pub mod structs;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use enums::{FacilityKind, Good, UpgradeKind};
pub use ids::{AuctionId, ModalId, PlayerId, RoomId};
pub use requests::{ClientRequest, ServerMessage};
pub use structs::{
    Auction, Bid, DelayedContract, Facility, LocationMemory, LocationState, MarketMemory, Modal,
    ModalPayload, NewsItem, PlayerState, PurchaseNote, Transit,
};
pub use view::{
    AuctionView, LocationView, PlayerDetail, PlayerPublic, PlayerView, RoomInfo, RoomSummary,
};
