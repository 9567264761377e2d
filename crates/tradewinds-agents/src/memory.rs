//! The trading agent's market memory.
//!
//! Bots remember what they saw at each visited location: prices, stock,
//! the fuel price, when they last bought each good and how much, how
//! often they have visited, and the realized profit of their most
//! recent visits. The strategy reads this memory; the turn pipeline
//! writes it as the bot docks, trades, and observes.

use tradewinds_types::{Good, LocationState, MarketMemory, PurchaseNote};

/// Record a new visit: bump the visit counter and refresh observations.
pub fn observe_visit(memory: &mut MarketMemory, loc: &LocationState, turn: u64) {
    let entry = memory.locations.entry(loc.name.clone()).or_default();
    entry.visits = entry.visits.saturating_add(1);
    entry.last_visit_turn = turn;
    entry.prices = loc.prices.clone();
    entry.stock = loc.stock.clone();
    entry.fuel_price = loc.fuel_price;
}

/// Refresh price/stock observations while docked, without counting a
/// new visit.
pub fn refresh(memory: &mut MarketMemory, loc: &LocationState) {
    let entry = memory.locations.entry(loc.name.clone()).or_default();
    entry.prices = loc.prices.clone();
    entry.stock = loc.stock.clone();
    entry.fuel_price = loc.fuel_price;
}

/// Record a purchase of `amount` units of `good` at `location`.
pub fn record_purchase(
    memory: &mut MarketMemory,
    location: &str,
    good: Good,
    turn: u64,
    amount: u32,
) {
    let entry = memory.locations.entry(String::from(location)).or_default();
    entry
        .last_purchase
        .insert(good, PurchaseNote { turn, amount });
}

/// Record realized profit from a sale at `location`, keeping only the
/// most recent `window` entries.
pub fn record_profit(memory: &mut MarketMemory, location: &str, profit: i64, window: usize) {
    let entry = memory.locations.entry(String::from(location)).or_default();
    entry.profits.push_back(profit);
    while entry.profits.len() > window.max(1) {
        entry.profits.pop_front();
    }
}

/// The best (highest) price remembered for `good` at any location other
/// than `exclude`.
pub fn best_price_elsewhere(
    memory: &MarketMemory,
    good: Good,
    exclude: &str,
) -> Option<(String, i64)> {
    memory
        .locations
        .iter()
        .filter(|(name, _)| name.as_str() != exclude)
        .filter_map(|(name, loc)| loc.prices.get(&good).map(|p| (name.clone(), *p)))
        .max_by_key(|(_, price)| *price)
}

/// Average stock of `good` across every remembered location.
pub fn remembered_avg_stock(memory: &MarketMemory, good: Good) -> Option<u32> {
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for loc in memory.locations.values() {
        if let Some(stock) = loc.stock.get(&good) {
            sum = sum.saturating_add(u64::from(*stock));
            count = count.saturating_add(1);
        }
    }
    if count == 0 {
        return None;
    }
    let avg = sum.checked_div(count).unwrap_or(0);
    Some(u32::try_from(avg).unwrap_or(u32::MAX))
}

/// Sum of the remembered recent profits at `location`.
pub fn recent_profit(memory: &MarketMemory, location: &str) -> i64 {
    memory
        .locations
        .get(location)
        .map(|loc| {
            let mut total: i64 = 0;
            for p in &loc.profits {
                total = total.saturating_add(*p);
            }
            total
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn make_location(name: &str, ore_price: i64) -> LocationState {
        let mut prices = BTreeMap::new();
        prices.insert(Good::Ore, ore_price);
        let mut stock = BTreeMap::new();
        stock.insert(Good::Ore, 80);
        LocationState {
            name: String::from(name),
            stock,
            prices,
            production: BTreeMap::new(),
            baseline_prices: BTreeMap::new(),
            baseline_production: BTreeMap::new(),
            drift: BTreeMap::new(),
            fuel_price: 12,
            baseline_fuel_price: 12,
            facilities: Vec::new(),
        }
    }

    #[test]
    fn visits_accumulate_and_observations_refresh() {
        let mut memory = MarketMemory::default();
        let loc = make_location("Araxis", 40);
        observe_visit(&mut memory, &loc, 1);
        observe_visit(&mut memory, &loc, 7);
        let entry = memory.locations.get("Araxis");
        assert_eq!(entry.map(|e| e.visits), Some(2));
        assert_eq!(entry.map(|e| e.last_visit_turn), Some(7));
    }

    #[test]
    fn best_price_elsewhere_excludes_current() {
        let mut memory = MarketMemory::default();
        observe_visit(&mut memory, &make_location("A", 40), 1);
        observe_visit(&mut memory, &make_location("B", 60), 2);
        observe_visit(&mut memory, &make_location("C", 50), 3);
        let best = best_price_elsewhere(&memory, Good::Ore, "B");
        assert_eq!(best, Some((String::from("C"), 50)));
    }

    #[test]
    fn profit_window_is_bounded() {
        let mut memory = MarketMemory::default();
        for i in 0..8_i64 {
            record_profit(&mut memory, "A", i, 5);
        }
        let profits = memory.locations.get("A").map(|e| e.profits.len());
        assert_eq!(profits, Some(5));
        // Oldest three were dropped: 3+4+5+6+7 = 25.
        assert_eq!(recent_profit(&memory, "A"), 25);
    }

    #[test]
    fn avg_stock_averages_across_locations() {
        let mut memory = MarketMemory::default();
        let mut a = make_location("A", 40);
        a.stock.insert(Good::Ore, 100);
        let mut b = make_location("B", 40);
        b.stock.insert(Good::Ore, 50);
        observe_visit(&mut memory, &a, 1);
        observe_visit(&mut memory, &b, 1);
        assert_eq!(remembered_avg_stock(&memory, Good::Ore), Some(75));
    }
}
