//! Cargo hold operations.
//!
//! The hold is a `BTreeMap<Good, u32>` with a parallel weighted-average
//! purchase-cost map. All mutation goes through these functions so the
//! capacity invariant (total load never exceeds effective capacity) and
//! the cost bookkeeping stay consistent. Checked arithmetic throughout;
//! no silent overflow, no panics.

use std::collections::BTreeMap;

use tradewinds_types::Good;

use crate::error::AgentError;

/// Total units currently held across all goods.
pub fn total_cargo(cargo: &BTreeMap<Good, u32>) -> u32 {
    let mut total: u32 = 0;
    for qty in cargo.values() {
        total = total.saturating_add(*qty);
    }
    total
}

/// Free space left in a hold of the given effective capacity.
pub fn space_remaining(cargo: &BTreeMap<Good, u32>, capacity: u32) -> u32 {
    capacity.saturating_sub(total_cargo(cargo))
}

/// Whether the hold contains at least `amount` of the given good.
pub fn has_cargo(cargo: &BTreeMap<Good, u32>, good: Good, amount: u32) -> bool {
    cargo.get(&good).copied().unwrap_or(0) >= amount
}

/// Add `amount` units of `good` bought at `unit_price`, updating the
/// weighted-average cost.
///
/// # Errors
///
/// Returns [`AgentError::CargoOverflow`] if the addition would exceed
/// `capacity`.
pub fn add_cargo(
    cargo: &mut BTreeMap<Good, u32>,
    avg_cost: &mut BTreeMap<Good, i64>,
    capacity: u32,
    good: Good,
    amount: u32,
    unit_price: i64,
) -> Result<(), AgentError> {
    if amount == 0 {
        return Ok(());
    }

    let current_load = total_cargo(cargo);
    let new_load = current_load.saturating_add(amount);
    if new_load > capacity {
        return Err(AgentError::CargoOverflow {
            good,
            attempted: amount,
            current_load,
            capacity,
        });
    }

    let held = cargo.get(&good).copied().unwrap_or(0);
    let old_cost = avg_cost.get(&good).copied().unwrap_or(0);

    // Weighted average over the combined quantity, in i128 so the
    // intermediate products cannot overflow.
    let combined = u64::from(held).saturating_add(u64::from(amount)).max(1);
    let weighted = i128::from(old_cost)
        .saturating_mul(i128::from(held))
        .saturating_add(i128::from(unit_price).saturating_mul(i128::from(amount)));
    let new_cost = weighted
        .checked_div(i128::from(combined))
        .unwrap_or(i128::from(unit_price));

    avg_cost.insert(good, i64::try_from(new_cost).unwrap_or(i64::MAX));
    cargo.insert(good, held.saturating_add(amount));
    Ok(())
}

/// Remove `amount` units of `good` from the hold.
///
/// The good's entry (and its average cost) is dropped entirely when the
/// quantity reaches zero.
///
/// # Errors
///
/// Returns [`AgentError::InsufficientCargo`] if the hold does not
/// contain `amount` units.
pub fn remove_cargo(
    cargo: &mut BTreeMap<Good, u32>,
    avg_cost: &mut BTreeMap<Good, i64>,
    good: Good,
    amount: u32,
) -> Result<(), AgentError> {
    let held = cargo.get(&good).copied().unwrap_or(0);
    if held < amount {
        return Err(AgentError::InsufficientCargo {
            good,
            requested: amount,
            available: held,
        });
    }

    let left = held.saturating_sub(amount);
    if left == 0 {
        cargo.remove(&good);
        avg_cost.remove(&good);
    } else {
        cargo.insert(good, left);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_respects_capacity() {
        let mut cargo = BTreeMap::new();
        let mut cost = BTreeMap::new();
        assert!(add_cargo(&mut cargo, &mut cost, 50, Good::Ore, 50, 10).is_ok());
        let err = add_cargo(&mut cargo, &mut cost, 50, Good::Ore, 1, 10);
        assert!(err.is_err());
        assert_eq!(total_cargo(&cargo), 50);
    }

    #[test]
    fn weighted_average_cost() {
        let mut cargo = BTreeMap::new();
        let mut cost = BTreeMap::new();
        assert!(add_cargo(&mut cargo, &mut cost, 100, Good::Food, 10, 20).is_ok());
        assert!(add_cargo(&mut cargo, &mut cost, 100, Good::Food, 30, 40).is_ok());
        // (10*20 + 30*40) / 40 = 35
        assert_eq!(cost.get(&Good::Food).copied(), Some(35));
    }

    #[test]
    fn remove_drops_entry_at_zero() {
        let mut cargo = BTreeMap::new();
        let mut cost = BTreeMap::new();
        assert!(add_cargo(&mut cargo, &mut cost, 100, Good::Water, 5, 3).is_ok());
        assert!(remove_cargo(&mut cargo, &mut cost, Good::Water, 5).is_ok());
        assert!(cargo.get(&Good::Water).is_none());
        assert!(cost.get(&Good::Water).is_none());
    }

    #[test]
    fn remove_more_than_held_errors() {
        let mut cargo = BTreeMap::new();
        let mut cost = BTreeMap::new();
        assert!(add_cargo(&mut cargo, &mut cost, 100, Good::Water, 5, 3).is_ok());
        assert!(remove_cargo(&mut cargo, &mut cost, Good::Water, 6).is_err());
        assert_eq!(cargo.get(&Good::Water).copied(), Some(5));
    }

    #[test]
    fn space_remaining_tracks_load() {
        let mut cargo = BTreeMap::new();
        let mut cost = BTreeMap::new();
        assert_eq!(space_remaining(&cargo, 60), 60);
        assert!(add_cargo(&mut cargo, &mut cost, 60, Good::Ore, 25, 10).is_ok());
        assert_eq!(space_remaining(&cargo, 60), 35);
    }
}
