//! Player state operations: money, bankruptcy, modals, history, upgrades.
//!
//! Money is signed and may go negative (debt). Any charge that drops
//! the balance strictly below the debt floor marks the player bankrupt;
//! the flag is one-way for the life of the room. Bankruptcy is never an
//! error -- the caller decides what to announce.

use std::collections::VecDeque;

use tradewinds_types::{Modal, ModalId, ModalPayload, PlayerId, PlayerState, UpgradeKind};

/// Maximum entries retained in a player's action-history log.
pub const HISTORY_LIMIT: usize = 50;

/// Outcome of a charge against a player's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeOutcome {
    /// Whether this charge crossed the debt floor and bankrupted the
    /// player. `false` for players who were already bankrupt.
    pub bankrupted: bool,
}

/// Construct a fresh player.
pub fn new_player(
    id: PlayerId,
    name: String,
    is_bot: bool,
    money: i64,
    location: String,
    fuel: u32,
) -> PlayerState {
    PlayerState {
        id,
        name,
        is_bot,
        connected: !is_bot,
        money,
        location,
        destination: None,
        cargo: std::collections::BTreeMap::new(),
        avg_cost: std::collections::BTreeMap::new(),
        fuel,
        cargo_bonus: 0,
        speed_bonus: 0,
        fuel_bonus: 0,
        transit: None,
        bankrupt: false,
        ready: false,
        end_game: false,
        modals: VecDeque::new(),
        history: VecDeque::new(),
        memory: is_bot.then(tradewinds_types::MarketMemory::default),
    }
}

/// Effective cargo capacity including upgrades.
pub const fn cargo_capacity(player: &PlayerState, base: u32) -> u32 {
    base.saturating_add(player.cargo_bonus)
}

/// Effective fuel capacity including upgrades.
pub const fn fuel_capacity(player: &PlayerState, base: u32) -> u32 {
    base.saturating_add(player.fuel_bonus)
}

/// Effective speed (distance per turn) including upgrades.
pub const fn speed(player: &PlayerState, base: u32) -> u32 {
    base.saturating_add(player.speed_bonus)
}

/// Deduct `amount` from the player's balance, marking bankruptcy if the
/// result crosses the debt floor.
///
/// The charge is always applied in full -- debt is allowed -- and the
/// bankruptcy flag transitions at most once.
pub fn charge(player: &mut PlayerState, amount: i64, debt_floor: i64) -> ChargeOutcome {
    player.money = player.money.saturating_sub(amount);
    if !player.bankrupt && player.money < debt_floor {
        player.bankrupt = true;
        return ChargeOutcome { bankrupted: true };
    }
    ChargeOutcome { bankrupted: false }
}

/// Add `amount` to the player's balance.
pub fn credit(player: &mut PlayerState, amount: i64) {
    player.money = player.money.saturating_add(amount);
}

/// Net worth: cash plus cargo valued at its average purchase cost.
pub fn net_worth(player: &PlayerState) -> i64 {
    let mut worth = i128::from(player.money);
    for (good, qty) in &player.cargo {
        let cost = player.avg_cost.get(good).copied().unwrap_or(0);
        worth = worth.saturating_add(i128::from(cost).saturating_mul(i128::from(*qty)));
    }
    i64::try_from(worth).unwrap_or(i64::MAX)
}

/// Queue a modal notification for the player and return its id.
pub fn push_modal(
    player: &mut PlayerState,
    title: impl Into<String>,
    body: impl Into<String>,
    payload: ModalPayload,
) -> ModalId {
    let id = ModalId::new();
    player.modals.push_back(Modal {
        id,
        title: title.into(),
        body: body.into(),
        payload,
    });
    id
}

/// The oldest pending modal, if any.
pub fn peek_modal(player: &PlayerState) -> Option<&Modal> {
    player.modals.front()
}

/// Remove and return the modal with the given id, wherever it sits in
/// the queue.
pub fn take_modal(player: &mut PlayerState, id: ModalId) -> Option<Modal> {
    let idx = player.modals.iter().position(|m| m.id == id)?;
    player.modals.remove(idx)
}

/// Append an entry to the bounded action-history log.
pub fn record_history(player: &mut PlayerState, entry: impl Into<String>) {
    player.history.push_back(entry.into());
    while player.history.len() > HISTORY_LIMIT {
        player.history.pop_front();
    }
}

/// Apply a purchased upgrade to the player's bonuses.
pub fn apply_upgrade(player: &mut PlayerState, kind: UpgradeKind, amount: u32) {
    match kind {
        UpgradeKind::Cargo => player.cargo_bonus = player.cargo_bonus.saturating_add(amount),
        UpgradeKind::Speed => player.speed_bonus = player.speed_bonus.saturating_add(amount),
        UpgradeKind::FuelTank => player.fuel_bonus = player.fuel_bonus.saturating_add(amount),
    }
}
