//! The fuel-constrained travel state machine.
//!
//! A destination different from the current location puts the player in
//! transit at the next turn. Each turn, movement is the minimum of
//! effective speed, remaining distance, and available fuel. Stranded
//! bots abort and replan; stranded humans keep the destination and are
//! told why they are not moving. Arrival and idle docking both charge
//! the dock tax, which can tip a player into bankruptcy.

use tradewinds_agents::player;
use tradewinds_types::{ModalPayload, PlayerId, Transit};

use crate::config::GameConfig;
use crate::room::Room;

/// Set a player's destination.
///
/// Returns a human-readable rejection reason if the destination is
/// unknown or is the current location; `Ok` otherwise. Mid-transit
/// retargeting is rejected by the caller's action guard.
///
/// # Errors
///
/// Returns the rejection text to notify the player with.
pub fn select_destination(
    room: &mut Room,
    player_id: PlayerId,
    destination: &str,
) -> Result<(), &'static str> {
    if !room.map.contains(destination) {
        return Err("no such planet");
    }
    let Some(p) = room.players.get_mut(&player_id) else {
        return Err("not in this room");
    };
    if p.location == destination {
        return Err("you are already docked there");
    }
    p.destination = Some(String::from(destination));
    player::record_history(p, format!("Set course for {destination}"));
    Ok(())
}

/// Advance every traveler by one turn and tax the docked.
///
/// Returns the players that arrived this turn with their new location,
/// so the pipeline can refresh bot memory.
pub fn advance_travel(room: &mut Room, cfg: &GameConfig) -> Vec<(PlayerId, String)> {
    let ids: Vec<PlayerId> = room.players.keys().copied().collect();
    let mut arrivals = Vec::new();

    for id in ids {
        let Some(p) = room.players.get(&id) else {
            continue;
        };
        if p.bankrupt {
            continue;
        }

        let traveling = p
            .destination
            .as_ref()
            .is_some_and(|d| d != &p.location);

        if traveling {
            if let Some(arrived) = step_traveler(room, id, cfg) {
                arrivals.push((id, arrived));
            }
        } else {
            // Docked and idle: the berth is not free.
            let _ = room.charge_player(id, cfg.rules.dock_tax, cfg);
        }
    }

    arrivals
}

/// Move one traveling player. Returns the destination on arrival.
fn step_traveler(room: &mut Room, id: PlayerId, cfg: &GameConfig) -> Option<String> {
    // Initialize transit on the first traveling turn.
    let distance_needed = {
        let p = room.players.get(&id)?;
        if p.transit.is_some() {
            None
        } else {
            let dest = p.destination.clone()?;
            room.map.distance(&p.location, &dest)
        }
    };
    if let Some(total) = distance_needed {
        if let Some(p) = room.players.get_mut(&id) {
            p.transit = Some(Transit {
                origin: p.location.clone(),
                remaining: total,
                total,
            });
        }
    }

    let p = room.players.get_mut(&id)?;
    let speed = player::speed(p, cfg.rules.base_speed);
    let remaining = p.transit.as_ref().map_or(0, |t| t.remaining);
    let movement = speed.min(remaining).min(p.fuel);

    if movement == 0 {
        if p.is_bot {
            // Bots abort and replan: they are free to refuel next turn.
            p.transit = None;
            p.destination = None;
            player::record_history(p, "Aborted trip: tanks dry");
        } else {
            player::push_modal(
                p,
                "Adrift",
                "Your tanks are dry. Buy fuel or wait for a kinder galaxy.",
                ModalPayload::Plain,
            );
        }
        return None;
    }

    p.fuel = p.fuel.saturating_sub(movement);
    let now_remaining = remaining.saturating_sub(movement);
    if let Some(t) = p.transit.as_mut() {
        t.remaining = now_remaining;
    }

    if now_remaining > 0 {
        return None;
    }

    // Arrival.
    let destination = p.destination.take().unwrap_or_else(|| p.location.clone());
    p.location = destination.clone();
    p.transit = None;
    player::record_history(p, format!("Arrived at {destination}"));
    let _ = room.charge_player(id, cfg.rules.dock_tax, cfg);
    Some(destination)
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

    /// Put the player on course with a rigged transit.
    fn rig_transit(room: &mut Room, id: PlayerId, remaining: u32, fuel: u32) {
        if let Some(p) = room.players.get_mut(&id) {
            p.destination = Some(String::from("Samsara"));
            p.fuel = fuel;
            p.transit = Some(Transit {
                origin: p.location.clone(),
                remaining,
                total: remaining,
            });
        }
    }

    #[test]
    fn movement_is_fuel_bound() {
        let (mut room, id, cfg) = setup();
        // Distance 35, speed 20, fuel 15: moves 15, remains in transit
        // with 20 to go.
        rig_transit(&mut room, id, 35, 15);
        let arrivals = advance_travel(&mut room, &cfg);
        assert!(arrivals.is_empty());
        let p = room.players.get(&id).unwrap();
        assert_eq!(p.fuel, 0);
        assert_eq!(p.transit.as_ref().map(|t| t.remaining), Some(20));
    }

    #[test]
    fn arrival_clears_transit_and_charges_dock_tax() {
        let (mut room, id, cfg) = setup();
        rig_transit(&mut room, id, 10, 50);
        let money_before = room.players.get(&id).map(|p| p.money).unwrap();
        let arrivals = advance_travel(&mut room, &cfg);
        assert_eq!(arrivals.len(), 1);
        let p = room.players.get(&id).unwrap();
        assert_eq!(p.location, "Samsara");
        assert!(p.transit.is_none());
        assert!(p.destination.is_none());
        assert_eq!(p.money, money_before.saturating_sub(cfg.rules.dock_tax));
    }

    #[test]
    fn stranded_human_keeps_destination() {
        let (mut room, id, cfg) = setup();
        rig_transit(&mut room, id, 35, 0);
        let _ = advance_travel(&mut room, &cfg);
        let p = room.players.get(&id).unwrap();
        assert_eq!(p.destination.as_deref(), Some("Samsara"));
        assert!(p.modals.iter().any(|m| m.title == "Adrift"));
    }

    #[test]
    fn stranded_bot_aborts_trip() {
        let (mut room, _, cfg) = setup();
        let bot = room.add_bot(&cfg).unwrap();
        rig_transit(&mut room, bot, 35, 0);
        let _ = advance_travel(&mut room, &cfg);
        let p = room.players.get(&bot).unwrap();
        assert!(p.destination.is_none());
        assert!(p.transit.is_none());
    }

    #[test]
    fn docked_idle_player_pays_dock_tax() {
        let (mut room, id, cfg) = setup();
        let before = room.players.get(&id).map(|p| p.money).unwrap();
        let _ = advance_travel(&mut room, &cfg);
        let after = room.players.get(&id).map(|p| p.money).unwrap();
        assert_eq!(after, before.saturating_sub(cfg.rules.dock_tax));
    }

    #[test]
    fn select_destination_validates() {
        let (mut room, id, _) = setup();
        assert!(select_destination(&mut room, id, "Nowhere").is_err());
        let here = room.players.get(&id).map(|p| p.location.clone()).unwrap();
        assert!(select_destination(&mut room, id, &here).is_err());
        assert!(select_destination(&mut room, id, "Samsara").is_ok());
    }

    #[test]
    fn transit_initializes_with_full_distance() {
        let (mut room, id, cfg) = setup();
        if let Some(p) = room.players.get_mut(&id) {
            p.fuel = 1;
        }
        let here = room.players.get(&id).map(|p| p.location.clone()).unwrap();
        assert!(select_destination(&mut room, id, "Samsara").is_ok());
        let _ = advance_travel(&mut room, &cfg);
        let p = room.players.get(&id).unwrap();
        let expected = room.map.distance(&here, "Samsara").unwrap();
        assert_eq!(p.transit.as_ref().map(|t| t.total), Some(expected));
        assert_eq!(
            p.transit.as_ref().map(|t| t.remaining),
            Some(expected.saturating_sub(1))
        );
    }
}
