//! The per-turn market simulation.
//!
//! Each turn, in order:
//!
//! 1. Every location's prices, production, and fuel price reset to
//!    their baselines.
//! 2. News items decay; expired items are removed.
//! 3. Each still-active news item applies its deltas, clamped to the
//!    good's static `[min, max]` range (production floored at zero),
//!    and the *sign* of each applied price delta is recorded as a bias
//!    for that location and good.
//! 4. The persistent per-good drift accumulator moves by one, biased
//!    toward the recorded sign, clamped so baseline plus drift stays in
//!    range; the drift lands on top of the post-news price and the
//!    result is re-clamped.
//! 5. Production is added to stock (capped).
//! 6. A fresh batch of 0--2 news items is rolled.

use std::collections::BTreeMap;

use rand::Rng;
use tradewinds_types::{Good, NewsItem};

use crate::goods;
use crate::map::StarMap;
use crate::news;

/// Sign bias recorded per location and good from applied news deltas.
pub type BiasMap = BTreeMap<String, BTreeMap<Good, i64>>;

/// Tunable market parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Percent chance the drift step follows the news bias sign when a
    /// bias exists (the remainder moves against it).
    pub drift_bias_pct: u32,
    /// Percent chance a first news item is rolled each turn.
    pub news_first_pct: u32,
    /// Percent chance a second news item is rolled each turn.
    pub news_second_pct: u32,
    /// Minimum news lifetime in turns.
    pub news_min_turns: u32,
    /// Maximum news lifetime in turns.
    pub news_max_turns: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            drift_bias_pct: 75,
            news_first_pct: 60,
            news_second_pct: 25,
            news_min_turns: 2,
            news_max_turns: 4,
        }
    }
}

/// Run one full market step over the map.
///
/// Mutates locations and the active news list in place and returns the
/// freshly rolled news items (already appended to `news`).
pub fn advance_market(
    map: &mut StarMap,
    news: &mut Vec<NewsItem>,
    rng: &mut impl Rng,
    cfg: &MarketConfig,
) -> Vec<NewsItem> {
    reset_to_baselines(map);
    expire_news(news);
    let bias = apply_news(map, news);
    decay_news(news);
    apply_drift(map, &bias, rng, cfg);
    apply_production(map);

    let fresh = news::roll_news(map, rng, cfg);
    news.extend(fresh.iter().cloned());
    fresh
}

/// Reset every location's prices, production, and fuel price to baseline.
fn reset_to_baselines(map: &mut StarMap) {
    for (_, loc) in map.iter_mut() {
        loc.prices = loc.baseline_prices.clone();
        loc.production = loc.baseline_production.clone();
        loc.fuel_price = loc.baseline_fuel_price;
    }
}

/// Drop news items whose remaining-turns counter has reached zero.
fn expire_news(news: &mut Vec<NewsItem>) {
    news.retain(|item| item.turns_remaining > 0);
}

/// Decrement every surviving item's remaining turns. Runs after the
/// deltas are applied, so an item rolled with N turns affects N turns.
fn decay_news(news: &mut [NewsItem]) {
    for item in news {
        item.turns_remaining = item.turns_remaining.saturating_sub(1);
    }
}

/// Apply every active news item's deltas and record price-delta signs.
fn apply_news(map: &mut StarMap, news: &[NewsItem]) -> BiasMap {
    let mut bias = BiasMap::new();

    for item in news {
        let Some(loc) = map.get_mut(&item.location) else {
            continue;
        };

        if let (Some(good), Some(delta)) = (item.good, item.price_delta) {
            let current = loc.prices.get(&good).copied().unwrap_or(0);
            let shifted = goods::clamp_price(good, current.saturating_add(delta));
            loc.prices.insert(good, shifted);
            bias.entry(item.location.clone())
                .or_default()
                .insert(good, delta.signum());
        }

        if let (Some(good), Some(delta)) = (item.good, item.production_delta) {
            let current = i64::from(loc.production.get(&good).copied().unwrap_or(0));
            let shifted = current.saturating_add(delta).max(0);
            loc.production
                .insert(good, u32::try_from(shifted).unwrap_or(u32::MAX));
        }

        if let Some(delta) = item.fuel_delta {
            loc.fuel_price = goods::clamp_fuel_price(loc.fuel_price.saturating_add(delta));
        }
    }

    bias
}

/// Move every drift accumulator by one step and land it on the price.
fn apply_drift(map: &mut StarMap, bias: &BiasMap, rng: &mut impl Rng, cfg: &MarketConfig) {
    for (name, loc) in map.iter_mut() {
        for good in Good::ALL {
            let sign = bias
                .get(name)
                .and_then(|m| m.get(&good))
                .copied()
                .unwrap_or(0);
            let step = drift_step(sign, rng, cfg);

            let spec = goods::spec(good);
            let baseline = loc.baseline_prices.get(&good).copied().unwrap_or(spec.base_price);
            // Drift may never push baseline+drift outside the range.
            let lo = spec.min_price.saturating_sub(baseline);
            let hi = spec.max_price.saturating_sub(baseline);

            let drift = loc.drift.entry(good).or_insert(0);
            *drift = drift.saturating_add(step).clamp(lo, hi);

            let current = loc.prices.get(&good).copied().unwrap_or(baseline);
            let drifted = goods::clamp_price(good, current.saturating_add(*drift));
            loc.prices.insert(good, drifted);
        }
    }
}

/// One drift step: +/-1, biased toward the news sign when one exists.
fn drift_step(sign: i64, rng: &mut impl Rng, cfg: &MarketConfig) -> i64 {
    let follow = rng.random_range(0_u32..100) < cfg.drift_bias_pct;
    match sign {
        s if s > 0 => {
            if follow {
                1
            } else {
                -1
            }
        }
        s if s < 0 => {
            if follow {
                -1
            } else {
                1
            }
        }
        _ => {
            if rng.random_range(0_u32..100) < 50 {
                1
            } else {
                -1
            }
        }
    }
}

/// Add each location's per-turn production to its stock, capped.
fn apply_production(map: &mut StarMap) {
    for (_, loc) in map.iter_mut() {
        for good in Good::ALL {
            let produced = loc.production.get(&good).copied().unwrap_or(0);
            if produced == 0 {
                continue;
            }
            let cap = goods::max_stock(good);
            let stock = loc.stock.entry(good).or_insert(0);
            *stock = stock.saturating_add(produced).min(cap);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::starting_world::create_starting_map;

    use super::*;

    fn flavor(turns_remaining: u32) -> NewsItem {
        NewsItem {
            headline: String::from("done"),
            location: String::from("Araxis"),
            good: None,
            price_delta: None,
            production_delta: None,
            fuel_delta: None,
            turns_remaining,
        }
    }

    #[test]
    fn news_expires_at_zero_after_affecting_its_full_lifetime() {
        // A 2-turn item survives two apply passes, then disappears.
        let mut news = vec![flavor(2)];

        expire_news(&mut news);
        assert_eq!(news.len(), 1);
        decay_news(&mut news);

        expire_news(&mut news);
        assert_eq!(news.len(), 1);
        decay_news(&mut news);

        expire_news(&mut news);
        assert!(news.is_empty());
    }

    #[test]
    fn prices_stay_in_range_over_many_turns() {
        let mut map = create_starting_map();
        let mut news = Vec::new();
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = MarketConfig::default();

        for _ in 0..300 {
            let _ = advance_market(&mut map, &mut news, &mut rng, &cfg);
            for (_, loc) in map.iter() {
                for good in Good::ALL {
                    let spec = goods::spec(good);
                    let price = loc.prices.get(&good).copied().unwrap_or(0);
                    assert!(price >= spec.min_price);
                    assert!(price <= spec.max_price);
                }
                assert!(loc.fuel_price >= goods::FUEL_MIN_PRICE);
                assert!(loc.fuel_price <= goods::FUEL_MAX_PRICE);
            }
        }
    }

    #[test]
    fn news_bias_steers_drift() {
        let cfg = MarketConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut up = 0_i32;
        for _ in 0..1_000 {
            if drift_step(1, &mut rng, &cfg) > 0 {
                up = up.saturating_add(1);
            }
        }
        // 75% bias should land well above a fair coin.
        assert!(up > 650);
        assert!(up < 850);
    }

    #[test]
    fn production_replenishes_stock_up_to_cap() {
        let mut map = create_starting_map();
        let name = map.names().first().cloned().unwrap_or_default();
        if let Some(loc) = map.get_mut(&name) {
            loc.stock.insert(Good::Water, 0);
            loc.production.insert(Good::Water, 40);
        }
        apply_production(&mut map);
        let stock = map
            .get(&name)
            .and_then(|l| l.stock.get(&Good::Water))
            .copied();
        assert_eq!(stock, Some(40));
    }
}
