//! Error types for the tradewinds-agents crate.
//!
//! All operations that can fail return typed errors rather than
//! panicking. Player-facing shortfalls (not enough money, stock, or
//! space) are normally handled by clamping in the trade layer; these
//! errors guard the lower-level invariant-preserving operations.

use tradewinds_types::Good;

/// Errors that can occur during player state operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Adding cargo would exceed the hold's capacity.
    #[error("cargo overflow: adding {attempted} of {good} would exceed capacity (load: {current_load}, capacity: {capacity})")]
    CargoOverflow {
        /// The good being added.
        good: Good,
        /// The quantity the caller attempted to add.
        attempted: u32,
        /// The current total load.
        current_load: u32,
        /// The effective capacity.
        capacity: u32,
    },

    /// Removing more of a good than the hold contains.
    #[error("insufficient cargo: wanted {requested} of {good} but only have {available}")]
    InsufficientCargo {
        /// The good being removed.
        good: Good,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// An arithmetic overflow occurred in a computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
