//! The per-turn pipeline.
//!
//! [`run_turn`] advances a room by exactly one turn, running the
//! subsystems in fixed order:
//!
//! 1. Market simulation (baseline reset, news, drift, production)
//! 2. Travel (movement, arrivals, dock taxes)
//! 3. Trading agents (memory refresh, decide, apply)
//! 4. Facilities & auction (countdown, resolution, usage fees)
//! 5. Random events and delayed contracts
//!
//! then resets every human's ready flag and pushes the turn deadline
//! out. Deterministic given the same starting state and RNG stream.

use rand::Rng;
use tradewinds_agents::{memory, strategy, ShipBases, TraderAction};
use tradewinds_types::{NewsItem, PlayerId};

use crate::auction::{self, AuctionResolution};
use crate::config::GameConfig;
use crate::events;
use crate::room::Room;
use crate::trade;
use crate::travel;

/// Summary of one executed turn.
#[derive(Debug, Clone)]
pub struct TurnSummary {
    /// The turn number that was executed.
    pub turn: u64,
    /// News items rolled this turn.
    pub fresh_news: Vec<NewsItem>,
    /// Players that arrived at a location this turn.
    pub arrivals: Vec<(PlayerId, String)>,
    /// The auction resolution, if one closed this turn.
    pub auction_resolved: Option<AuctionResolution>,
}

/// Execute one complete turn.
pub fn run_turn(room: &mut Room, rng: &mut impl Rng, cfg: &GameConfig) -> TurnSummary {
    room.turn = room.turn.saturating_add(1);
    tracing::debug!(room = %room.id, turn = room.turn, "turn starting");

    let fresh_news =
        tradewinds_world::advance_market(&mut room.map, &mut room.news, rng, &cfg.market);
    let arrivals = travel::advance_travel(room, cfg);
    run_bots(room, &arrivals, rng, cfg);
    let auction_resolved = auction::advance_auction(room, rng, cfg);
    auction::charge_facilities(room, cfg);
    events::run_events(room, rng, cfg);
    events::apply_contracts(room, rng, cfg);

    room.reset_ready();
    room.set_deadline(cfg);

    TurnSummary {
        turn: room.turn,
        fresh_news,
        arrivals,
        auction_resolved,
    }
}

/// Run the trading agent for every docked, solvent bot.
fn run_bots(room: &mut Room, arrivals: &[(PlayerId, String)], rng: &mut impl Rng, cfg: &GameConfig) {
    let bases = ShipBases {
        cargo_capacity: cfg.rules.base_cargo_capacity,
        fuel_capacity: cfg.rules.base_fuel_capacity,
        speed: cfg.rules.base_speed,
    };

    let bot_ids: Vec<PlayerId> = room
        .players
        .values()
        .filter(|p| p.is_bot && !p.bankrupt && p.transit.is_none())
        .map(|p| p.id)
        .collect();

    for id in bot_ids {
        // Update memory before deciding: a fresh arrival counts as a
        // visit, staying docked just refreshes the observations.
        let arrived = arrivals.iter().any(|(pid, _)| *pid == id);
        let location = match room.players.get(&id) {
            Some(p) => p.location.clone(),
            None => continue,
        };
        if let Some(loc) = room.map.get(&location) {
            if let Some(p) = room.players.get_mut(&id) {
                if let Some(mem) = p.memory.as_mut() {
                    if arrived {
                        memory::observe_visit(mem, loc, room.turn);
                    } else {
                        memory::refresh(mem, loc);
                    }
                }
            }
        }

        // Decide against an owned snapshot, then apply through the same
        // operations human requests use.
        let Some(snapshot) = room.players.get(&id).cloned() else {
            continue;
        };
        let Some(loc) = room.map.get(&location) else {
            continue;
        };
        let actions = strategy::decide(&snapshot, loc, &room.map, room.turn, &bases, &cfg.strategy, rng);

        for action in actions {
            match action {
                TraderAction::Sell { good, amount } => {
                    let _ = trade::sell(room, id, good, amount, cfg);
                }
                TraderAction::Buy { good, amount } => {
                    let _ = trade::buy(room, id, good, amount, cfg);
                }
                TraderAction::Refuel { amount } => {
                    let _ = trade::refuel(room, id, amount, cfg);
                }
                TraderAction::SetDestination { destination } => {
                    let _ = travel::select_destination(room, id, &destination);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn turn_counter_advances_by_exactly_one() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let _ = room.add_bot(&cfg).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        for expected in 1..=20_u64 {
            let summary = run_turn(&mut room, &mut rng, &cfg);
            assert_eq!(summary.turn, expected);
            assert_eq!(room.turn, expected);
        }
    }

    #[test]
    fn ready_flags_reset_each_turn() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let id = tradewinds_types::PlayerId::new();
        room.add_player(id, String::from("Ada"), &cfg).unwrap();
        if let Some(p) = room.players.get_mut(&id) {
            p.ready = true;
        }
        let mut rng = SmallRng::seed_from_u64(2);
        let _ = run_turn(&mut room, &mut rng, &cfg);
        assert!(!room.players.get(&id).map(|p| p.ready).unwrap());
    }

    #[test]
    fn deadline_is_pushed_forward() {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let mut rng = SmallRng::seed_from_u64(3);
        let _ = run_turn(&mut room, &mut rng, &cfg);
        assert!(room.turn_deadline.is_some());
    }
}
