//! Player state operations and the heuristic trading agent for Tradewinds.
//!
//! This crate owns the player side of the simulation: cargo hold
//! bookkeeping, money and bankruptcy, modal queues and history, the
//! trading agent's market memory, and the trading strategy itself as a
//! standalone, independently testable decision object.
//!
//! # Modules
//!
//! - [`cargo`] -- Capacity-checked cargo operations with average-cost tracking
//! - [`player`] -- Money, bankruptcy, modals, history, upgrades
//! - [`memory`] -- The trading agent's per-location market memory
//! - [`strategy`] -- The heuristic trading strategy and its actions
//! - [`config`] -- Tunable strategy thresholds
//! - [`error`] -- Error types

pub mod cargo;
pub mod config;
pub mod error;
pub mod memory;
pub mod player;
pub mod strategy;

pub use config::StrategyConfig;
pub use error::AgentError;
pub use strategy::{decide, ShipBases, TraderAction};
