//! The random event system: per-player economic and navigational luck.
//!
//! Every turn each non-bankrupt player rolls a fixed set of independent
//! low-probability events. Humans receive the outcomes as modals; bots
//! get history entries and resolve offers on the spot. The rare covert
//! contract is offered to humans only and, if it does not backfire,
//! schedules a [`DelayedContract`] that hits every rival exactly once
//! on the following turns.
//!
//! [`DelayedContract`]: tradewinds_types::DelayedContract

use rand::Rng;
use tradewinds_agents::{cargo, player, strategy};
use tradewinds_types::{
    DelayedContract, Good, ModalId, ModalPayload, PlayerId, UpgradeKind,
};

use crate::config::GameConfig;
use crate::room::Room;

/// One event roll against a per-mille probability.
fn roll(rng: &mut impl Rng, per_mille: u32) -> bool {
    rng.random_range(0_u32..1_000) < per_mille
}

/// A uniform draw from an inclusive `i64` range.
fn draw_i64(rng: &mut impl Rng, range: (i64, i64)) -> i64 {
    let (lo, hi) = range;
    rng.random_range(lo..=hi.max(lo))
}

/// A uniform draw from an inclusive `u32` range.
fn draw_u32(rng: &mut impl Rng, range: (u32, u32)) -> u32 {
    let (lo, hi) = range;
    rng.random_range(lo..=hi.max(lo))
}

/// Percent of `value`, saturating.
fn pct_of(value: i64, pct: u32) -> i64 {
    value
        .saturating_mul(i64::from(pct))
        .checked_div(100)
        .unwrap_or(0)
}

/// A random good currently held by the player, if any.
fn random_held_good(room: &Room, id: PlayerId, rng: &mut impl Rng) -> Option<Good> {
    let p = room.players.get(&id)?;
    let held: Vec<Good> = p.cargo.keys().copied().collect();
    if held.is_empty() {
        return None;
    }
    held.get(rng.random_range(0..held.len())).copied()
}

/// Tell one player what just happened: a modal for humans, a history
/// line for bots.
fn notify(room: &mut Room, id: PlayerId, title: &str, body: String) {
    if let Some(p) = room.players.get_mut(&id) {
        if p.is_bot {
            player::record_history(p, format!("{title}: {body}"));
        } else {
            player::push_modal(p, title, body, ModalPayload::Plain);
        }
    }
}

/// Run the full event table for every non-bankrupt player.
pub fn run_events(room: &mut Room, rng: &mut impl Rng, cfg: &GameConfig) {
    let ids: Vec<PlayerId> = room
        .players
        .values()
        .filter(|p| !p.bankrupt)
        .map(|p| p.id)
        .collect();

    for id in ids {
        run_events_for(room, id, rng, cfg);
    }
}

/// Roll every event once for one player.
#[allow(clippy::too_many_lines)]
fn run_events_for(room: &mut Room, id: PlayerId, rng: &mut impl Rng, cfg: &GameConfig) {
    let ev = &cfg.events;

    if roll(rng, ev.income_tax_pm) {
        let worth = room.players.get(&id).map(player::net_worth).unwrap_or(0);
        if worth > 0 {
            let pct = draw_u32(rng, ev.income_tax_pct);
            let tax = pct_of(worth, pct);
            let _ = room.charge_player(id, tax, cfg);
            notify(room, id, "Income tax", format!("The revenue service takes {tax} credits."));
        }
    }

    if roll(rng, ev.lottery_pm) {
        let prize = draw_i64(rng, ev.lottery_amount);
        if let Some(p) = room.players.get_mut(&id) {
            player::credit(p, prize);
        }
        notify(room, id, "Lottery", format!("Your old ticket pays out {prize} credits."));
    }

    if roll(rng, ev.pirate_pm) {
        let cash = room.players.get(&id).map(|p| p.money).unwrap_or(0);
        if cash > 0 {
            let pct = draw_u32(rng, ev.pirate_pct);
            let haul = pct_of(cash, pct);
            let _ = room.charge_player(id, haul, cfg);
            notify(room, id, "Pirates", format!("Raiders shake you down for {haul} credits."));
        }
    }

    if roll(rng, ev.insurance_pm) {
        let payout = draw_i64(rng, ev.insurance_amount);
        if let Some(p) = room.players.get_mut(&id) {
            player::credit(p, payout);
        }
        notify(room, id, "Insurance", format!("An old claim settles for {payout} credits."));
    }

    if roll(rng, ev.spoilage_pm) {
        if let Some(good) = random_held_good(room, id, rng) {
            let pct = draw_u32(rng, ev.spoilage_pct);
            if let Some(p) = room.players.get_mut(&id) {
                let held = p.cargo.get(&good).copied().unwrap_or(0);
                let lost = u32::try_from(pct_of(i64::from(held), pct).max(1)).unwrap_or(1).min(held);
                if lost > 0
                    && cargo::remove_cargo(&mut p.cargo, &mut p.avg_cost, good, lost).is_ok()
                {
                    notify(room, id, "Spoilage", format!("{lost} units of {good} rot in the hold."));
                }
            }
        }
    }

    if roll(rng, ev.trade_bonus_pm) {
        let bonus = draw_i64(rng, ev.trade_bonus_amount);
        if let Some(p) = room.players.get_mut(&id) {
            player::credit(p, bonus);
        }
        notify(room, id, "Trade bonus", format!("A grateful guild wires you {bonus} credits."));
    }

    if roll(rng, ev.malfunction_pm) {
        let speed_bonus = room
            .players
            .get(&id)
            .map(|p| p.speed_bonus)
            .unwrap_or(0);
        let cost = ev
            .malfunction_base
            .saturating_add(ev.malfunction_per_speed.saturating_mul(i64::from(speed_bonus)));
        let _ = room.charge_player(id, cost, cfg);
        notify(room, id, "Malfunction", format!("Drive repairs cost {cost} credits."));
    }

    if roll(rng, ev.salvage_pm) {
        let qty = draw_u32(rng, ev.salvage_qty);
        let good = Good::ALL
            .get(rng.random_range(0..Good::ALL.len()))
            .copied()
            .unwrap_or(Good::Ore);
        if let Some(p) = room.players.get_mut(&id) {
            let capacity = player::cargo_capacity(p, cfg.rules.base_cargo_capacity);
            let space = cargo::space_remaining(&p.cargo, capacity);
            let taken = qty.min(space);
            if taken > 0
                && cargo::add_cargo(&mut p.cargo, &mut p.avg_cost, capacity, good, taken, 0).is_ok()
            {
                notify(room, id, "Salvage", format!("You haul {taken} drifting units of {good} aboard."));
            }
        }
    }

    if roll(rng, ev.fuel_leak_pm) {
        if let Some(p) = room.players.get_mut(&id) {
            if p.fuel > 0 {
                let pct = draw_u32(rng, ev.fuel_leak_pct);
                let lost = u32::try_from(pct_of(i64::from(p.fuel), pct).max(1)).unwrap_or(1).min(p.fuel);
                p.fuel = p.fuel.saturating_sub(lost);
                notify(room, id, "Fuel leak", format!("A cracked seal vents {lost} units of fuel."));
            }
        }
    }

    if roll(rng, ev.shop_offer_pm) {
        offer_upgrade(room, id, rng, cfg);
    }

    if roll(rng, ev.covert_offer_pm) {
        let is_human = room.players.get(&id).is_some_and(|p| !p.is_bot);
        if is_human {
            let price = draw_i64(rng, ev.covert_price);
            if let Some(p) = room.players.get_mut(&id) {
                player::push_modal(
                    p,
                    "A quiet proposal",
                    format!(
                        "A stranger offers to arrange misfortune for your rivals. Price: {price} credits. No questions."
                    ),
                    ModalPayload::CovertOffer { price },
                );
            }
        }
    }
}

/// Present (humans) or auto-resolve (bots) a shop upgrade offer.
fn offer_upgrade(room: &mut Room, id: PlayerId, rng: &mut impl Rng, cfg: &GameConfig) {
    let kind = UpgradeKind::ALL
        .get(rng.random_range(0..UpgradeKind::ALL.len()))
        .copied()
        .unwrap_or(UpgradeKind::Cargo);
    let (amount, per_unit) = match kind {
        UpgradeKind::Cargo => (draw_u32(rng, (5, 15)), 30_i64),
        UpgradeKind::Speed => (draw_u32(rng, (2, 6)), 120_i64),
        UpgradeKind::FuelTank => (draw_u32(rng, (5, 20)), 25_i64),
    };
    let price = per_unit.saturating_mul(i64::from(amount));

    let Some(p) = room.players.get(&id) else {
        return;
    };
    if p.is_bot {
        let payload = ModalPayload::UpgradeOffer {
            upgrade: kind,
            amount,
            price,
        };
        if strategy::auto_resolve_offer(p, &payload, &cfg.strategy, rng) {
            let _ = room.charge_player(id, price, cfg);
            if let Some(p) = room.players.get_mut(&id) {
                player::apply_upgrade(p, kind, amount);
                player::record_history(p, format!("Bought {kind} (+{amount}) for {price}"));
            }
        }
    } else if let Some(p) = room.players.get_mut(&id) {
        player::push_modal(
            p,
            "Shipyard offer",
            format!("{kind}: +{amount} for {price} credits. Deal?"),
            ModalPayload::UpgradeOffer {
                upgrade: kind,
                amount,
                price,
            },
        );
    }
}

/// Resolve a player's answer to a pending modal.
///
/// Returns a notice for the player, or `None` when a plain
/// acknowledgement needs no reply. An unknown modal id yields an error
/// notice so the client resynchronizes.
pub fn resolve_modal(
    room: &mut Room,
    player_id: PlayerId,
    modal_id: ModalId,
    accept: bool,
    rng: &mut impl Rng,
    cfg: &GameConfig,
) -> Option<String> {
    let modal = {
        let p = room.players.get_mut(&player_id)?;
        player::take_modal(p, modal_id)?
    };

    match modal.payload {
        ModalPayload::Plain | ModalPayload::AuctionPrompt { .. } => None,
        ModalPayload::UpgradeOffer {
            upgrade,
            amount,
            price,
        } => {
            if !accept {
                return Some(String::from("Offer declined."));
            }
            let money = room.players.get(&player_id).map(|p| p.money).unwrap_or(0);
            if money < price {
                return Some(String::from("You cannot afford that upgrade."));
            }
            let _ = room.charge_player(player_id, price, cfg);
            if let Some(p) = room.players.get_mut(&player_id) {
                player::apply_upgrade(p, upgrade, amount);
                player::record_history(p, format!("Bought {upgrade} (+{amount}) for {price}"));
            }
            Some(format!("{upgrade} installed."))
        }
        ModalPayload::CovertOffer { price } => {
            if !accept {
                return Some(String::from("You walk away."));
            }
            let _ = room.charge_player(player_id, price, cfg);
            if rng.random_range(0_u32..100) < cfg.events.covert_backfire_pct {
                let fine = draw_i64(rng, cfg.events.covert_fine);
                let _ = room.charge_player(player_id, fine, cfg);
                if let Some(good) = random_held_good(room, player_id, rng) {
                    if let Some(p) = room.players.get_mut(&player_id) {
                        let held = p.cargo.get(&good).copied().unwrap_or(0);
                        let _ = cargo::remove_cargo(&mut p.cargo, &mut p.avg_cost, good, held);
                    }
                }
                notify(
                    room,
                    player_id,
                    "Sting",
                    format!("The stranger wore a badge. Fined {fine} credits; cargo impounded."),
                );
                Some(String::from("The deal went very badly."))
            } else {
                let trigger_turn = room.turn.saturating_add(1);
                room.contracts.push(DelayedContract {
                    instigator: player_id,
                    trigger_turn,
                    price_paid: price,
                    applied: std::collections::BTreeSet::new(),
                });
                Some(String::from("It will be done. Quietly."))
            }
        }
    }
}

/// Apply every due delayed contract: one random negative effect per
/// rival, each rival hit exactly once, then retire the contract.
pub fn apply_contracts(room: &mut Room, rng: &mut impl Rng, cfg: &GameConfig) {
    let mut contracts = std::mem::take(&mut room.contracts);

    for contract in &mut contracts {
        if room.turn < contract.trigger_turn {
            continue;
        }
        let targets: Vec<PlayerId> = room
            .players
            .values()
            .filter(|p| {
                !p.bankrupt && p.id != contract.instigator && !contract.applied.contains(&p.id)
            })
            .map(|p| p.id)
            .collect();
        for target in targets {
            apply_covert_effect(room, target, rng, cfg);
            contract.applied.insert(target);
        }
    }

    // Retire contracts once every current rival has been hit.
    contracts.retain(|c| {
        room.players
            .values()
            .any(|p| !p.bankrupt && p.id != c.instigator && !c.applied.contains(&p.id))
    });
    room.contracts = contracts;
}

/// One random covert effect: cargo loss, fuel loss, or credit loss.
fn apply_covert_effect(room: &mut Room, id: PlayerId, rng: &mut impl Rng, cfg: &GameConfig) {
    let ev = &cfg.events;
    match rng.random_range(0_u32..3) {
        0 => {
            if let Some(good) = random_held_good(room, id, rng) {
                let pct = draw_u32(rng, ev.covert_loss_pct);
                if let Some(p) = room.players.get_mut(&id) {
                    let held = p.cargo.get(&good).copied().unwrap_or(0);
                    let lost =
                        u32::try_from(pct_of(i64::from(held), pct).max(1)).unwrap_or(1).min(held);
                    if lost > 0
                        && cargo::remove_cargo(&mut p.cargo, &mut p.avg_cost, good, lost).is_ok()
                    {
                        notify(room, id, "Sabotage", format!("{lost} units of {good} vanish from a sealed hold."));
                        return;
                    }
                }
            }
            // Nothing to steal: fall back to a credit hit.
            let loss = draw_i64(rng, ev.covert_credit_loss);
            let _ = room.charge_player(id, loss, cfg);
            notify(room, id, "Sabotage", format!("{loss} credits disappear from your accounts."));
        }
        1 => {
            if let Some(p) = room.players.get_mut(&id) {
                let pct = draw_u32(rng, ev.covert_loss_pct);
                let lost = u32::try_from(pct_of(i64::from(p.fuel), pct).max(1)).unwrap_or(1).min(p.fuel);
                p.fuel = p.fuel.saturating_sub(lost);
            }
            notify(room, id, "Sabotage", String::from("Someone has been at your fuel lines."));
        }
        _ => {
            let loss = draw_i64(rng, ev.covert_credit_loss);
            let _ = room.charge_player(id, loss, cfg);
            notify(room, id, "Sabotage", format!("{loss} credits disappear from your accounts."));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tradewinds_types::Modal;

    use super::*;

    fn setup_two() -> (Room, PlayerId, PlayerId, GameConfig) {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let a = PlayerId::new();
        let b = PlayerId::new();
        room.add_player(a, String::from("Ada"), &cfg).unwrap();
        room.add_player(b, String::from("Brin"), &cfg).unwrap();
        (room, a, b, cfg)
    }

    fn pending_covert(room: &mut Room, id: PlayerId, price: i64) -> ModalId {
        let p = room.players.get_mut(&id).unwrap();
        player::push_modal(
            p,
            "A quiet proposal",
            String::from("..."),
            ModalPayload::CovertOffer { price },
        )
    }

    #[test]
    fn declined_covert_offer_changes_nothing() {
        let (mut room, a, _, cfg) = setup_two();
        let modal = pending_covert(&mut room, a, 300);
        let before = room.players.get(&a).map(|p| p.money).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let notice = resolve_modal(&mut room, a, modal, false, &mut rng, &cfg);
        assert!(notice.is_some());
        assert_eq!(room.players.get(&a).map(|p| p.money), Some(before));
        assert!(room.contracts.is_empty());
    }

    #[test]
    fn accepted_covert_offer_charges_and_schedules_or_backfires() {
        let (mut room, a, _, cfg) = setup_two();
        let modal = pending_covert(&mut room, a, 300);
        let before = room.players.get(&a).map(|p| p.money).unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        let _ = resolve_modal(&mut room, a, modal, true, &mut rng, &cfg);
        let after = room.players.get(&a).map(|p| p.money).unwrap();
        // The price is always paid, backfire or not.
        assert!(after <= before.saturating_sub(300));
    }

    #[test]
    fn contract_hits_each_rival_exactly_once_then_retires() {
        let (mut room, a, b, cfg) = setup_two();
        room.turn = 5;
        room.contracts.push(DelayedContract {
            instigator: a,
            trigger_turn: 6,
            price_paid: 300,
            applied: std::collections::BTreeSet::new(),
        });

        let b_money = room.players.get(&b).map(|p| p.money).unwrap();
        let b_fuel = room.players.get(&b).map(|p| p.fuel).unwrap();

        // Not due yet.
        let mut rng = SmallRng::seed_from_u64(3);
        apply_contracts(&mut room, &mut rng, &cfg);
        assert_eq!(room.contracts.len(), 1);

        room.turn = 6;
        apply_contracts(&mut room, &mut rng, &cfg);
        // Retired after hitting the only rival.
        assert!(room.contracts.is_empty());

        let hit_money = room.players.get(&b).map(|p| p.money).unwrap();
        let hit_fuel = room.players.get(&b).map(|p| p.fuel).unwrap();
        let was_hit = hit_money < b_money || hit_fuel < b_fuel;
        assert!(was_hit);

        // The instigator is untouchable.
        let a_state = room.players.get(&a).unwrap();
        assert_eq!(a_state.money, cfg.rules.starting_money);
    }

    #[test]
    fn upgrade_offer_accept_applies_and_charges() {
        let (mut room, a, _, cfg) = setup_two();
        let modal = {
            let p = room.players.get_mut(&a).unwrap();
            player::push_modal(
                p,
                "Shipyard offer",
                String::from("..."),
                ModalPayload::UpgradeOffer {
                    upgrade: UpgradeKind::Cargo,
                    amount: 10,
                    price: 300,
                },
            )
        };
        let mut rng = SmallRng::seed_from_u64(4);
        let notice = resolve_modal(&mut room, a, modal, true, &mut rng, &cfg);
        assert!(notice.is_some());
        let p = room.players.get(&a).unwrap();
        assert_eq!(p.cargo_bonus, 10);
        assert_eq!(p.money, cfg.rules.starting_money.saturating_sub(300));
    }

    #[test]
    fn unknown_modal_id_is_none() {
        let (mut room, a, _, cfg) = setup_two();
        let mut rng = SmallRng::seed_from_u64(5);
        let notice = resolve_modal(&mut room, a, ModalId::new(), true, &mut rng, &cfg);
        assert!(notice.is_none());
    }

    #[test]
    fn events_never_touch_the_bankrupt() {
        let (mut room, a, _, cfg) = setup_two();
        if let Some(p) = room.players.get_mut(&a) {
            p.bankrupt = true;
            p.money = -600;
        }
        let mut rng = SmallRng::seed_from_u64(6);
        for _ in 0..50 {
            run_events(&mut room, &mut rng, &cfg);
        }
        let p = room.players.get(&a).unwrap();
        // Bankrupt players are excluded from the event table entirely;
        // the only modals they could hold predate bankruptcy.
        assert_eq!(p.money, -600);
        let offers: Vec<&Modal> = p
            .modals
            .iter()
            .filter(|m| !matches!(m.payload, ModalPayload::Plain))
            .collect();
        assert!(offers.is_empty());
    }
}
