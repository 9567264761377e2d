//! Tunable parameters of the trading agent.
//!
//! The thresholds here are empirically tuned, not derived from a
//! model; they are preserved as named constants and may be overridden
//! from the room configuration file.

use serde::{Deserialize, Serialize};

/// Configuration for [`decide`] and the other trading-agent entry points.
///
/// [`decide`]: crate::strategy::decide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Sell a good when its local price reaches this percent of the
    /// best price remembered elsewhere.
    pub sell_threshold_pct: u32,
    /// Relaxed sell threshold used while money is below `low_money`.
    pub sell_threshold_low_pct: u32,
    /// Below this balance the agent is considered financially distressed.
    pub low_money: i64,
    /// Below this balance the agent sells anything priced above its
    /// average cost.
    pub critical_money: i64,
    /// Buy a good when its local price is below this percent of the
    /// best price remembered elsewhere.
    pub buy_threshold_pct: u32,
    /// Cold-start buy rule: with no remembered elsewhere-price, buy
    /// when the price sits below this percent of the good's range span
    /// above its minimum.
    pub buy_span_pct: u32,
    /// Skip buying a good whose local stock has fallen below this
    /// percent of the stock remembered on average across locations.
    pub depleted_stock_pct: u32,
    /// Fuel units the agent tries to keep on board.
    pub fuel_reserve: u32,
    /// Top up whenever fuel falls below this floor.
    pub fuel_floor: u32,
    /// Cash the agent tries not to spend on goods.
    pub cash_cushion: i64,
    /// Weight of selling opportunities in destination scoring.
    pub sell_weight: i64,
    /// Weight of buying opportunities in destination scoring.
    pub buy_weight: i64,
    /// Percent score reduction applied per prior visit to a candidate
    /// destination.
    pub visit_penalty_pct: u32,
    /// Turns after a purchase during which the same good at the same
    /// location contributes nothing to destination scoring.
    pub replenish_cooldown: u64,
    /// Number of recent visits whose profit is remembered per location.
    pub profit_window: usize,
    /// Minimum destination score required while finances are healthy;
    /// under distress any positive score is accepted.
    pub min_destination_score: i64,
    /// Percent chance a bot accepts an affordable shop upgrade offer.
    pub upgrade_accept_pct: u32,
    /// Percent jitter applied to the suggested bid when a bot bids.
    pub bid_jitter_pct: u32,
    /// Cash a bot keeps untouched when deciding whether it can bid.
    pub bid_safety_buffer: i64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            sell_threshold_pct: 80,
            sell_threshold_low_pct: 65,
            low_money: 600,
            critical_money: 250,
            buy_threshold_pct: 70,
            buy_span_pct: 46,
            depleted_stock_pct: 25,
            fuel_reserve: 25,
            fuel_floor: 15,
            cash_cushion: 100,
            sell_weight: 3,
            buy_weight: 2,
            visit_penalty_pct: 15,
            replenish_cooldown: 3,
            profit_window: 5,
            min_destination_score: 50,
            upgrade_accept_pct: 40,
            bid_jitter_pct: 10,
            bid_safety_buffer: 300,
        }
    }
}
