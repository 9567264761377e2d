//! The seeded starting map every new room begins from.
//!
//! Eight planets on a 2D layout, each with a trade character: a few
//! goods it produces cheaply and a few it imports dearly. Baseline
//! prices derive from the galaxy-wide good baselines scaled by that
//! character, then clamped into the good's static range.

use std::collections::BTreeMap;

use tradewinds_types::{Good, LocationState};

use crate::goods;
use crate::map::{LayoutPos, StarMap};

/// Percent of the baseline price charged where a good is locally produced.
const CHEAP_PCT: i64 = 70;

/// Percent of the baseline price charged where a good must be imported.
const DEAR_PCT: i64 = 135;

/// Seed data for one planet.
struct PlanetSeed {
    /// Planet name.
    name: &'static str,
    /// Layout position.
    x: i64,
    /// Layout position.
    y: i64,
    /// Goods produced locally (cheap, high production).
    cheap: &'static [Good],
    /// Goods imported (dear, no local production).
    dear: &'static [Good],
    /// Baseline fuel price at this planet.
    fuel_price: i64,
}

/// The eight starting planets.
const PLANETS: [PlanetSeed; 8] = [
    PlanetSeed {
        name: "New Ceres",
        x: 10,
        y: 14,
        cheap: &[Good::Water, Good::Food],
        dear: &[Good::Electronics, Good::Machinery],
        fuel_price: 10,
    },
    PlanetSeed {
        name: "Port Vesta",
        x: 42,
        y: 8,
        cheap: &[Good::Ore],
        dear: &[Good::Food, Good::Medicine],
        fuel_price: 12,
    },
    PlanetSeed {
        name: "Meridian",
        x: 75,
        y: 20,
        cheap: &[Good::Electronics, Good::Medicine],
        dear: &[Good::Ore, Good::Water],
        fuel_price: 14,
    },
    PlanetSeed {
        name: "Thule Station",
        x: 105,
        y: 12,
        cheap: &[Good::Machinery],
        dear: &[Good::Food, Good::Textiles],
        fuel_price: 16,
    },
    PlanetSeed {
        name: "Araxis",
        x: 18,
        y: 58,
        cheap: &[Good::Textiles, Good::Food],
        dear: &[Good::Machinery, Good::Luxuries],
        fuel_price: 9,
    },
    PlanetSeed {
        name: "Kepler Landing",
        x: 52,
        y: 66,
        cheap: &[Good::Water, Good::Ore],
        dear: &[Good::Electronics, Good::Luxuries],
        fuel_price: 11,
    },
    PlanetSeed {
        name: "Volkov Yards",
        x: 88,
        y: 55,
        cheap: &[Good::Machinery, Good::Electronics],
        dear: &[Good::Water, Good::Food],
        fuel_price: 15,
    },
    PlanetSeed {
        name: "Samsara",
        x: 120,
        y: 70,
        cheap: &[Good::Luxuries],
        dear: &[Good::Ore, Good::Medicine],
        fuel_price: 13,
    },
];

/// Build the starting star map.
pub fn create_starting_map() -> StarMap {
    let mut map = StarMap::new();
    for seed in &PLANETS {
        let state = seed_location(seed);
        let pos = LayoutPos { x: seed.x, y: seed.y };
        // Seed names are distinct by construction.
        if map.add_location(state, pos).is_err() {
            tracing::warn!(planet = seed.name, "duplicate planet in seed table, skipped");
        }
    }
    map
}

/// Build one location's baseline state from its seed.
fn seed_location(seed: &PlanetSeed) -> LocationState {
    let mut baseline_prices = BTreeMap::new();
    let mut baseline_production = BTreeMap::new();
    let mut stock = BTreeMap::new();

    for good in Good::ALL {
        let spec = goods::spec(good);

        let pct = if seed.cheap.contains(&good) {
            CHEAP_PCT
        } else if seed.dear.contains(&good) {
            DEAR_PCT
        } else {
            100
        };
        let price = spec
            .base_price
            .saturating_mul(pct)
            .checked_div(100)
            .unwrap_or(spec.base_price);
        baseline_prices.insert(good, goods::clamp_price(good, price));

        let production = if seed.cheap.contains(&good) {
            spec.base_production.saturating_mul(2)
        } else if seed.dear.contains(&good) {
            0
        } else {
            spec.base_production
        };
        baseline_production.insert(good, production);

        let initial_stock = if seed.dear.contains(&good) {
            spec.base_stock.checked_div(4).unwrap_or(0)
        } else {
            spec.base_stock
        };
        stock.insert(good, initial_stock);
    }

    LocationState {
        name: String::from(seed.name),
        stock,
        prices: baseline_prices.clone(),
        production: baseline_production.clone(),
        baseline_prices,
        baseline_production,
        drift: BTreeMap::new(),
        fuel_price: seed.fuel_price,
        baseline_fuel_price: seed.fuel_price,
        facilities: Vec::new(),
    }
}
