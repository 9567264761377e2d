//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in a YAML file (`tradewinds.yaml`
//! by default). Every section has serde defaults, so a missing file or
//! a partial file yields a fully playable configuration. The tuned
//! trading-agent thresholds and market parameters are re-exported from
//! their owning crates and embedded here so one file configures the
//! whole server.

use std::path::Path;

use serde::Deserialize;
use tradewinds_agents::StrategyConfig;
use tradewinds_world::MarketConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Core game rules: timing, starting resources, taxes, limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Wall-clock seconds per turn.
    pub turn_seconds: u64,
    /// Poll interval in milliseconds used when only bots remain.
    pub bot_turn_ms: u64,
    /// Credits a new player starts with.
    pub starting_money: i64,
    /// Fuel units a new player starts with.
    pub starting_fuel: u32,
    /// Base cargo capacity before upgrades.
    pub base_cargo_capacity: u32,
    /// Base fuel capacity before upgrades.
    pub base_fuel_capacity: u32,
    /// Base speed (distance per turn) before upgrades.
    pub base_speed: u32,
    /// Dock tax charged on arrival and per docked turn.
    pub dock_tax: i64,
    /// Balance strictly below which a player goes bankrupt.
    pub debt_floor: i64,
    /// Maximum players (humans plus bots) per room.
    pub max_players: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 30,
            bot_turn_ms: 250,
            starting_money: 1_500,
            starting_fuel: 30,
            base_cargo_capacity: 50,
            base_fuel_capacity: 60,
            base_speed: 20,
            dock_tax: 10,
            debt_floor: -500,
            max_players: 8,
        }
    }
}

/// Facility auction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Percent chance a new auction starts on a turn with none active.
    pub start_pct: u32,
    /// Turns an auction stays open.
    pub duration_turns: u32,
    /// Maximum facilities a single location can hold.
    pub max_facilities_per_location: usize,
    /// Percent jitter applied to the archetype base value when deriving
    /// the suggested bid.
    pub suggested_bid_jitter_pct: u32,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            start_pct: 8,
            duration_turns: 3,
            max_facilities_per_location: 3,
            suggested_bid_jitter_pct: 20,
        }
    }
}

/// Random event probabilities (per mille per player per turn) and
/// magnitude ranges (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Income tax probability.
    pub income_tax_pm: u32,
    /// Income tax percent range of net worth.
    pub income_tax_pct: (u32, u32),
    /// Lottery windfall probability.
    pub lottery_pm: u32,
    /// Lottery payout range.
    pub lottery_amount: (i64, i64),
    /// Pirate raid probability.
    pub pirate_pm: u32,
    /// Pirate haul percent range of cash on hand.
    pub pirate_pct: (u32, u32),
    /// Insurance payout probability.
    pub insurance_pm: u32,
    /// Insurance payout range.
    pub insurance_amount: (i64, i64),
    /// Cargo spoilage probability.
    pub spoilage_pm: u32,
    /// Spoilage percent range of one held good.
    pub spoilage_pct: (u32, u32),
    /// Trade-route bonus probability.
    pub trade_bonus_pm: u32,
    /// Trade-route bonus range.
    pub trade_bonus_amount: (i64, i64),
    /// Equipment malfunction probability.
    pub malfunction_pm: u32,
    /// Flat malfunction repair cost.
    pub malfunction_base: i64,
    /// Additional repair cost per point of speed bonus.
    pub malfunction_per_speed: i64,
    /// Salvage discovery probability.
    pub salvage_pm: u32,
    /// Salvage quantity range.
    pub salvage_qty: (u32, u32),
    /// Fuel leak probability.
    pub fuel_leak_pm: u32,
    /// Fuel leak percent range of current fuel.
    pub fuel_leak_pct: (u32, u32),
    /// Shop upgrade offer probability.
    pub shop_offer_pm: u32,
    /// Covert contract offer probability (humans only).
    pub covert_offer_pm: u32,
    /// Covert contract price range.
    pub covert_price: (i64, i64),
    /// Percent chance an accepted covert contract backfires immediately.
    pub covert_backfire_pct: u32,
    /// Fine range when a covert contract backfires.
    pub covert_fine: (i64, i64),
    /// Percent range of cargo or fuel lost to a covert effect.
    pub covert_loss_pct: (u32, u32),
    /// Credit loss range of a covert effect.
    pub covert_credit_loss: (i64, i64),
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            income_tax_pm: 25,
            income_tax_pct: (5, 15),
            lottery_pm: 15,
            lottery_amount: (100, 500),
            pirate_pm: 20,
            pirate_pct: (10, 30),
            insurance_pm: 15,
            insurance_amount: (50, 300),
            spoilage_pm: 20,
            spoilage_pct: (20, 60),
            trade_bonus_pm: 15,
            trade_bonus_amount: (50, 250),
            malfunction_pm: 15,
            malfunction_base: 40,
            malfunction_per_speed: 15,
            salvage_pm: 15,
            salvage_qty: (3, 12),
            fuel_leak_pm: 15,
            fuel_leak_pct: (20, 50),
            shop_offer_pm: 40,
            covert_offer_pm: 8,
            covert_price: (200, 600),
            covert_backfire_pct: 30,
            covert_fine: (100, 400),
            covert_loss_pct: (20, 50),
            covert_credit_loss: (100, 400),
        }
    }
}

/// Server-facing settings (listener, persistence directory).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port the WebSocket/REST listener binds.
    pub port: u16,
    /// Directory private-room save records are written to.
    pub save_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            save_dir: String::from("saves"),
        }
    }
}

/// Top-level configuration for the whole server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Core game rules.
    pub rules: RulesConfig,
    /// Market simulation parameters.
    pub market: MarketConfig,
    /// Trading-agent thresholds.
    pub strategy: StrategyConfig,
    /// Facility auction parameters.
    pub auction: AuctionConfig,
    /// Random event probabilities and magnitudes.
    pub events: EventConfig,
    /// Server listener settings.
    pub server: ServerConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if
    /// the file does not exist. Parse errors are still surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}
