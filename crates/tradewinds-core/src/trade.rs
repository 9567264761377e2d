//! Buy, sell, and refuel with maximal-feasible clamping.
//!
//! Invalid or over-sized requests are never errors: each operation
//! computes the largest amount that stock, capacity, and funds
//! genuinely allow (often zero) and applies exactly that. No partial
//! mutation ever exceeds those bounds, and the caller broadcasts the
//! resulting state either way so clients resynchronize.

use tradewinds_agents::{cargo, memory, player};
use tradewinds_types::{Good, PlayerId};

use crate::config::GameConfig;
use crate::room::Room;

/// What a trade operation actually did after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TradeOutcome {
    /// Units actually traded (possibly zero).
    pub amount: u32,
    /// Credits that changed hands.
    pub total: i64,
}

/// How many whole units a balance can afford at a unit price.
fn affordable(money: i64, unit_price: i64) -> u32 {
    if money <= 0 || unit_price <= 0 {
        return 0;
    }
    u32::try_from(money.checked_div(unit_price).unwrap_or(0).max(0)).unwrap_or(u32::MAX)
}

/// Buy up to `amount` units of `good` at the player's docked location.
///
/// The purchase is clamped to local stock, free cargo space, and what
/// the player's balance affords.
pub fn buy(
    room: &mut Room,
    player_id: PlayerId,
    good: Good,
    amount: u32,
    cfg: &GameConfig,
) -> TradeOutcome {
    let Some(p) = room.players.get(&player_id) else {
        return TradeOutcome::default();
    };
    let location = p.location.clone();
    let Some(loc) = room.map.get(&location) else {
        return TradeOutcome::default();
    };

    let price = loc.prices.get(&good).copied().unwrap_or(0);
    let stock = loc.stock.get(&good).copied().unwrap_or(0);
    if price <= 0 {
        return TradeOutcome::default();
    }

    let capacity = player::cargo_capacity(p, cfg.rules.base_cargo_capacity);
    let space = cargo::space_remaining(&p.cargo, capacity);
    let n = amount.min(stock).min(space).min(affordable(p.money, price));
    if n == 0 {
        return TradeOutcome::default();
    }
    let total = price.saturating_mul(i64::from(n));

    if let Some(loc) = room.map.get_mut(&location) {
        let entry = loc.stock.entry(good).or_insert(0);
        *entry = entry.saturating_sub(n);
    }
    if let Some(p) = room.players.get_mut(&player_id) {
        p.money = p.money.saturating_sub(total);
        let capacity = player::cargo_capacity(p, cfg.rules.base_cargo_capacity);
        // Clamped to free space above, so this cannot overflow the hold.
        if let Err(err) = cargo::add_cargo(&mut p.cargo, &mut p.avg_cost, capacity, good, n, price)
        {
            tracing::warn!(player = %player_id, %err, "buy clamped amount failed to load");
        }
        player::record_history(p, format!("Bought {n} {good} at {price} ({location})"));
        if let Some(mem) = p.memory.as_mut() {
            memory::record_purchase(mem, &location, good, room.turn, n);
        }
    }
    TradeOutcome { amount: n, total }
}

/// Sell up to `amount` units of `good` at the player's docked location.
///
/// Clamped to the held quantity; stock returns to the location, capped.
pub fn sell(
    room: &mut Room,
    player_id: PlayerId,
    good: Good,
    amount: u32,
    cfg: &GameConfig,
) -> TradeOutcome {
    let Some(p) = room.players.get(&player_id) else {
        return TradeOutcome::default();
    };
    let location = p.location.clone();
    let Some(loc) = room.map.get(&location) else {
        return TradeOutcome::default();
    };

    let price = loc.prices.get(&good).copied().unwrap_or(0);
    let held = p.cargo.get(&good).copied().unwrap_or(0);
    let n = amount.min(held);
    if n == 0 {
        return TradeOutcome::default();
    }
    let total = price.saturating_mul(i64::from(n));
    let avg = p.avg_cost.get(&good).copied().unwrap_or(0);
    let profit = price.saturating_sub(avg).saturating_mul(i64::from(n));

    if let Some(loc) = room.map.get_mut(&location) {
        let cap = tradewinds_world::goods::max_stock(good);
        let entry = loc.stock.entry(good).or_insert(0);
        *entry = entry.saturating_add(n).min(cap);
    }
    if let Some(p) = room.players.get_mut(&player_id) {
        if let Err(err) = cargo::remove_cargo(&mut p.cargo, &mut p.avg_cost, good, n) {
            tracing::warn!(player = %player_id, %err, "sell clamped amount failed to unload");
            return TradeOutcome::default();
        }
        player::credit(p, total);
        player::record_history(p, format!("Sold {n} {good} at {price} ({location})"));
        if let Some(mem) = p.memory.as_mut() {
            memory::record_profit(mem, &location, profit, cfg.strategy.profit_window);
        }
    }
    TradeOutcome { amount: n, total }
}

/// Buy up to `amount` units of fuel at the player's docked location.
///
/// Clamped to remaining tank capacity and what the balance affords.
pub fn refuel(room: &mut Room, player_id: PlayerId, amount: u32, cfg: &GameConfig) -> TradeOutcome {
    let Some(p) = room.players.get(&player_id) else {
        return TradeOutcome::default();
    };
    let Some(loc) = room.map.get(&p.location) else {
        return TradeOutcome::default();
    };

    let price = loc.fuel_price;
    let capacity = player::fuel_capacity(p, cfg.rules.base_fuel_capacity);
    let headroom = capacity.saturating_sub(p.fuel);
    let n = amount.min(headroom).min(affordable(p.money, price));
    if n == 0 {
        return TradeOutcome::default();
    }
    let total = price.saturating_mul(i64::from(n));

    if let Some(p) = room.players.get_mut(&player_id) {
        p.money = p.money.saturating_sub(total);
        p.fuel = p.fuel.saturating_add(n);
        player::record_history(p, format!("Refueled {n} units at {price}"));
    }
    TradeOutcome { amount: n, total }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradewinds_types::PlayerId;

    use super::*;

    fn setup() -> (Room, PlayerId, GameConfig) {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let id = PlayerId::new();
        room.add_player(id, String::from("Ada"), &cfg).unwrap();
        (room, id, cfg)
    }

    /// Fix one good's price and stock at the player's location.
    fn rig_market(room: &mut Room, id: PlayerId, good: Good, price: i64, stock: u32) -> String {
        let location = room.players.get(&id).map(|p| p.location.clone()).unwrap();
        if let Some(loc) = room.map.get_mut(&location) {
            loc.prices.insert(good, price);
            loc.stock.insert(good, stock);
        }
        location
    }

    #[test]
    fn buy_is_capacity_bound_not_money_bound() {
        let (mut room, id, cfg) = setup();
        let _ = rig_market(&mut room, id, Good::Water, 10, 1_000);
        if let Some(p) = room.players.get_mut(&id) {
            p.money = 1_000;
        }
        // 500 requested, $1,000 cash, 50 free slots at $10: capacity binds.
        let outcome = buy(&mut room, id, Good::Water, 500, &cfg);
        assert_eq!(outcome.amount, 50);
        assert_eq!(outcome.total, 500);
        let p = room.players.get(&id).unwrap();
        assert_eq!(p.cargo.get(&Good::Water).copied(), Some(50));
        assert_eq!(p.money, 500);
    }

    #[test]
    fn buy_is_stock_bound() {
        let (mut room, id, cfg) = setup();
        let location = rig_market(&mut room, id, Good::Ore, 5, 7);
        let outcome = buy(&mut room, id, Good::Ore, 100, &cfg);
        assert_eq!(outcome.amount, 7);
        let left = room
            .map
            .get(&location)
            .and_then(|l| l.stock.get(&Good::Ore))
            .copied();
        assert_eq!(left, Some(0));
    }

    #[test]
    fn buy_with_no_funds_is_zero() {
        let (mut room, id, cfg) = setup();
        let _ = rig_market(&mut room, id, Good::Ore, 50, 100);
        if let Some(p) = room.players.get_mut(&id) {
            p.money = -20;
        }
        let outcome = buy(&mut room, id, Good::Ore, 10, &cfg);
        assert_eq!(outcome.amount, 0);
        assert_eq!(outcome.total, 0);
    }

    #[test]
    fn sell_clamps_to_held_quantity() {
        let (mut room, id, cfg) = setup();
        let _ = rig_market(&mut room, id, Good::Food, 20, 0);
        if let Some(p) = room.players.get_mut(&id) {
            p.cargo.insert(Good::Food, 6);
            p.avg_cost.insert(Good::Food, 10);
            p.money = 0;
        }
        let outcome = sell(&mut room, id, Good::Food, 50, &cfg);
        assert_eq!(outcome.amount, 6);
        assert_eq!(outcome.total, 120);
        let p = room.players.get(&id).unwrap();
        assert!(p.cargo.get(&Good::Food).is_none());
        assert_eq!(p.money, 120);
    }

    #[test]
    fn refuel_clamps_to_tank_and_funds() {
        let (mut room, id, cfg) = setup();
        if let Some(p) = room.players.get_mut(&id) {
            p.fuel = 55;
            p.money = 1_000_000;
        }
        // Tank is 60: only 5 units fit regardless of funds.
        let outcome = refuel(&mut room, id, 100, &cfg);
        assert_eq!(outcome.amount, 5);
        let p = room.players.get(&id).unwrap();
        assert_eq!(p.fuel, 60);
    }
}
