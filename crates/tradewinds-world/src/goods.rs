//! Static goods catalogue: baseline prices, price ranges, and production.
//!
//! Every good has a fixed `[min, max]` price range that holds for all
//! locations and all turns -- news shocks and drift are always clamped
//! back into it. The baselines here are the galaxy-wide defaults; each
//! location's own baselines are derived from them when the starting
//! world is seeded.

use tradewinds_types::Good;

/// Static parameters of one good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoodSpec {
    /// Galaxy-wide baseline price.
    pub base_price: i64,
    /// Lowest price the good can ever reach.
    pub min_price: i64,
    /// Highest price the good can ever reach.
    pub max_price: i64,
    /// Baseline units produced per turn at an average location.
    pub base_production: u32,
    /// Baseline stock a location starts with.
    pub base_stock: u32,
}

impl GoodSpec {
    /// Width of the price range.
    pub const fn span(&self) -> i64 {
        self.max_price.saturating_sub(self.min_price)
    }
}

/// Look up the static parameters of a good.
pub const fn spec(good: Good) -> GoodSpec {
    match good {
        Good::Water => GoodSpec {
            base_price: 8,
            min_price: 2,
            max_price: 20,
            base_production: 30,
            base_stock: 200,
        },
        Good::Food => GoodSpec {
            base_price: 15,
            min_price: 5,
            max_price: 40,
            base_production: 25,
            base_stock: 150,
        },
        Good::Ore => GoodSpec {
            base_price: 35,
            min_price: 12,
            max_price: 90,
            base_production: 15,
            base_stock: 100,
        },
        Good::Textiles => GoodSpec {
            base_price: 28,
            min_price: 10,
            max_price: 70,
            base_production: 18,
            base_stock: 110,
        },
        Good::Medicine => GoodSpec {
            base_price: 80,
            min_price: 30,
            max_price: 220,
            base_production: 8,
            base_stock: 50,
        },
        Good::Electronics => GoodSpec {
            base_price: 110,
            min_price: 45,
            max_price: 300,
            base_production: 6,
            base_stock: 40,
        },
        Good::Machinery => GoodSpec {
            base_price: 150,
            min_price: 60,
            max_price: 400,
            base_production: 5,
            base_stock: 35,
        },
        Good::Luxuries => GoodSpec {
            base_price: 210,
            min_price: 80,
            max_price: 600,
            base_production: 3,
            base_stock: 20,
        },
    }
}

/// Clamp a price into the good's static range.
pub const fn clamp_price(good: Good, price: i64) -> i64 {
    let s = spec(good);
    if price < s.min_price {
        s.min_price
    } else if price > s.max_price {
        s.max_price
    } else {
        price
    }
}

/// Stock is capped at this multiple of the good's baseline stock so
/// production shocks cannot grow it without bound.
pub const STOCK_CAP_MULTIPLIER: u32 = 3;

/// Maximum stock a location can hold of a good.
pub const fn max_stock(good: Good) -> u32 {
    spec(good).base_stock.saturating_mul(STOCK_CAP_MULTIPLIER)
}

// ---------------------------------------------------------------------------
// Fuel
// ---------------------------------------------------------------------------

/// Galaxy-wide baseline fuel price.
pub const FUEL_BASE_PRICE: i64 = 12;

/// Lowest possible fuel price.
pub const FUEL_MIN_PRICE: i64 = 4;

/// Highest possible fuel price.
pub const FUEL_MAX_PRICE: i64 = 40;

/// Clamp a fuel price into its static range.
pub const fn clamp_fuel_price(price: i64) -> i64 {
    if price < FUEL_MIN_PRICE {
        FUEL_MIN_PRICE
    } else if price > FUEL_MAX_PRICE {
        FUEL_MAX_PRICE
    } else {
        price
    }
}
