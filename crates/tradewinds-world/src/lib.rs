//! Star map, goods catalogue, and market simulation for Tradewinds.
//!
//! This crate owns the market side of the simulation: the static goods
//! catalogue with per-good price ranges, the star map with 2D layout
//! distances, the per-turn market step (baseline reset, news
//! application, persistent price drift, production), and news
//! generation.
//!
//! # Modules
//!
//! - [`goods`] -- Static goods catalogue and price clamping
//! - [`map`] -- The star map and distance computation
//! - [`market`] -- The per-turn market simulation step
//! - [`news`] -- Random news generation
//! - [`starting_world`] -- The seeded starting map
//! - [`error`] -- Error types

pub mod error;
pub mod goods;
pub mod map;
pub mod market;
pub mod news;
pub mod starting_world;

pub use error::WorldError;
pub use goods::GoodSpec;
pub use map::{LayoutPos, StarMap};
pub use market::{advance_market, MarketConfig};
pub use starting_world::create_starting_map;
