//! Core entity structs for the Tradewinds simulation.
//!
//! These are passive data records; the logic that mutates them lives in
//! the `tradewinds-world`, `tradewinds-agents`, and `tradewinds-core`
//! crates. Everything here is serde-serializable because all of it can
//! appear inside a room snapshot.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::enums::{FacilityKind, Good, UpgradeKind};
use crate::ids::{AuctionId, ModalId, PlayerId};

// ---------------------------------------------------------------------------
// Transit
// ---------------------------------------------------------------------------

/// A player's in-progress multi-turn movement between two locations.
///
/// Present on a player iff remaining distance is greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transit {
    /// The location the player departed from.
    pub origin: String,
    /// Distance units still to cover.
    pub remaining: u32,
    /// Total distance of the trip when it started.
    pub total: u32,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Mutable state of one player (human or bot) inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// The player's identity.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Whether this player is controlled by the trading agent.
    pub is_bot: bool,
    /// Whether a connection is currently attached to this player.
    pub connected: bool,
    /// Credits. Signed: may go negative, representing debt.
    pub money: i64,
    /// Name of the location the player is docked at (or departed from
    /// while in transit).
    pub location: String,
    /// Chosen destination, if any.
    pub destination: Option<String>,
    /// Cargo hold contents.
    pub cargo: BTreeMap<Good, u32>,
    /// Weighted-average purchase cost per held good.
    pub avg_cost: BTreeMap<Good, i64>,
    /// Current fuel units.
    pub fuel: u32,
    /// Extra cargo capacity from upgrades.
    pub cargo_bonus: u32,
    /// Extra travel speed from upgrades.
    pub speed_bonus: u32,
    /// Extra fuel capacity from upgrades.
    pub fuel_bonus: u32,
    /// In-progress movement, if any.
    pub transit: Option<Transit>,
    /// One-way insolvency flag.
    pub bankrupt: bool,
    /// Whether the player has marked ready for the next turn.
    pub ready: bool,
    /// Whether the player has voted to end the game.
    pub end_game: bool,
    /// Pending modal notifications, oldest first.
    pub modals: VecDeque<Modal>,
    /// Bounded action-history log, oldest first.
    pub history: VecDeque<String>,
    /// Price memory across visited locations. Present only for bots.
    pub memory: Option<MarketMemory>,
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Mutable market state of one location.
///
/// Prices and production are recomputed from the baselines every turn
/// before news deltas and drift are applied; stock persists across turns
/// and is mutated by trades and production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    /// Location name (unique within a room).
    pub name: String,
    /// Current stock per good.
    pub stock: BTreeMap<Good, u32>,
    /// Current price per good.
    pub prices: BTreeMap<Good, i64>,
    /// Current per-turn production per good.
    pub production: BTreeMap<Good, u32>,
    /// Baseline prices restored at the start of every market step.
    pub baseline_prices: BTreeMap<Good, i64>,
    /// Baseline per-turn production.
    pub baseline_production: BTreeMap<Good, u32>,
    /// Persistent price-drift accumulator per good.
    pub drift: BTreeMap<Good, i64>,
    /// Current fuel price.
    pub fuel_price: i64,
    /// Baseline fuel price restored each market step.
    pub baseline_fuel_price: i64,
    /// Facilities attached to this location (bounded count).
    pub facilities: Vec<Facility>,
}

// ---------------------------------------------------------------------------
// Facility & Auction
// ---------------------------------------------------------------------------

/// A player-owned facility attached to a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// The facility archetype.
    pub kind: FacilityKind,
    /// The owning player.
    pub owner: PlayerId,
    /// Per-turn charge levied on docked non-owners.
    pub usage_charge: i64,
    /// Revenue accrued but not yet collected by the owner.
    pub accrued: i64,
    /// The price the owner paid at auction.
    pub purchase_price: i64,
}

/// A single recorded bid. Bids are kept in arrival order; a player
/// re-bidding updates their entry in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// The bidding player.
    pub player: PlayerId,
    /// The bid amount in credits.
    pub amount: i64,
}

/// An in-progress facility auction. At most one exists per room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// Auction identity.
    pub id: AuctionId,
    /// The facility archetype being auctioned.
    pub kind: FacilityKind,
    /// The location the facility will attach to.
    pub location: String,
    /// The usage charge the facility will levy.
    pub usage_charge: i64,
    /// Suggested opening bid shown to players.
    pub suggested_bid: i64,
    /// Recorded bids in arrival order.
    pub bids: Vec<Bid>,
    /// Turns until the auction resolves.
    pub turns_remaining: u32,
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

/// A temporary, decaying modifier to a location's prices or production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline shown to players.
    pub headline: String,
    /// The affected location.
    pub location: String,
    /// The affected good, for price/production shocks.
    pub good: Option<Good>,
    /// Price delta applied while the item is active.
    pub price_delta: Option<i64>,
    /// Production delta applied while the item is active.
    pub production_delta: Option<i64>,
    /// Fuel-price delta applied while the item is active.
    pub fuel_delta: Option<i64>,
    /// Turns remaining; decremented each turn and removed at zero.
    pub turns_remaining: u32,
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

/// Kind-specific payload of a modal notification.
///
/// One variant per modal kind, so response handling can match
/// exhaustively instead of probing optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ModalPayload {
    /// A plain message requiring only acknowledgement.
    Plain,
    /// A shop offer for a ship upgrade.
    #[serde(rename_all = "camelCase")]
    UpgradeOffer {
        /// The upgrade on offer.
        upgrade: UpgradeKind,
        /// Units of the upgrade (capacity points, speed points).
        amount: u32,
        /// Asking price in credits.
        price: i64,
    },
    /// A prompt that a facility auction is open for bids.
    #[serde(rename_all = "camelCase")]
    AuctionPrompt {
        /// The auction being announced.
        auction_id: AuctionId,
        /// Suggested opening bid.
        suggested_bid: i64,
    },
    /// A covert-contract offer with a delayed, hidden payoff.
    #[serde(rename_all = "camelCase")]
    CovertOffer {
        /// The price of taking the contract.
        price: i64,
    },
}

/// A modal notification queued for one player.
///
/// Modals are delivered one at a time (FIFO) and resolved by
/// acknowledge or accept/decline responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    /// Modal identity, echoed back by the client's response.
    pub id: ModalId,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Kind-specific payload.
    pub payload: ModalPayload,
}

// ---------------------------------------------------------------------------
// Delayed contracts
// ---------------------------------------------------------------------------

/// A paid covert contract that applies a hidden negative effect to every
/// rival exactly once, starting at the trigger turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedContract {
    /// The player who paid for the contract.
    pub instigator: PlayerId,
    /// First turn on which effects are applied.
    pub trigger_turn: u64,
    /// The price the instigator paid.
    pub price_paid: i64,
    /// Players already hit; the contract retires once every other
    /// non-bankrupt player is in this set.
    pub applied: BTreeSet<PlayerId>,
}

// ---------------------------------------------------------------------------
// Trading-agent memory
// ---------------------------------------------------------------------------

/// Record of the last purchase of one good at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseNote {
    /// Turn the purchase happened on.
    pub turn: u64,
    /// Units purchased.
    pub amount: u32,
}

/// What a trading agent remembers about one visited location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMemory {
    /// Last-seen price per good.
    pub prices: BTreeMap<Good, i64>,
    /// Last-seen stock per good.
    pub stock: BTreeMap<Good, u32>,
    /// Last-seen fuel price.
    pub fuel_price: i64,
    /// Last purchase per good at this location.
    pub last_purchase: BTreeMap<Good, PurchaseNote>,
    /// Number of visits the agent has made here.
    pub visits: u32,
    /// Turn of the most recent visit.
    pub last_visit_turn: u64,
    /// Realized profit of the most recent visits, newest last (bounded).
    pub profits: VecDeque<i64>,
}

/// A trading agent's memory across all visited locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMemory {
    /// Per-location memory, keyed by location name.
    pub locations: BTreeMap<String, LocationMemory>,
}
