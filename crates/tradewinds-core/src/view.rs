//! The per-player view builder.
//!
//! Builds the filtered projection of room state one player is allowed
//! to see: the shared room summary, their own full detail, the market
//! detail of the location they are docked at (nothing while in
//! transit -- fog of war), active news, the auction with only their own
//! bid, and the oldest pending modal.

use tradewinds_agents::player;
use tradewinds_types::{
    AuctionView, LocationView, PlayerDetail, PlayerId, PlayerPublic, PlayerView, RoomSummary,
};

use crate::config::GameConfig;
use crate::room::Room;

/// Build the view for one player. `None` if they are not in the room.
pub fn build_view(room: &Room, player_id: PlayerId, cfg: &GameConfig) -> Option<PlayerView> {
    let p = room.players.get(&player_id)?;

    let players: Vec<PlayerPublic> = room
        .players
        .values()
        .map(|other| PlayerPublic {
            id: other.id,
            name: other.name.clone(),
            is_bot: other.is_bot,
            connected: other.connected,
            location: other.transit.is_none().then(|| other.location.clone()),
            bankrupt: other.bankrupt,
            ready: other.ready,
        })
        .collect();

    let summary = RoomSummary {
        id: room.id,
        name: room.name.clone(),
        started: room.started,
        paused: room.paused,
        turn: room.turn,
        turn_deadline: room.turn_deadline.map(|d| d.to_rfc3339()),
        players,
    };

    let you = PlayerDetail {
        id: p.id,
        name: p.name.clone(),
        money: p.money,
        location: p.location.clone(),
        destination: p.destination.clone(),
        cargo: p.cargo.clone(),
        avg_cost: p.avg_cost.clone(),
        fuel: p.fuel,
        cargo_capacity: player::cargo_capacity(p, cfg.rules.base_cargo_capacity),
        fuel_capacity: player::fuel_capacity(p, cfg.rules.base_fuel_capacity),
        speed: player::speed(p, cfg.rules.base_speed),
        transit: p.transit.clone(),
        bankrupt: p.bankrupt,
        end_game: p.end_game,
        history: p.history.iter().cloned().collect(),
    };

    let location = if p.transit.is_none() {
        room.map.get(&p.location).map(|loc| LocationView {
            name: loc.name.clone(),
            stock: loc.stock.clone(),
            prices: loc.prices.clone(),
            fuel_price: loc.fuel_price,
            facilities: loc.facilities.clone(),
        })
    } else {
        None
    };

    let auction = room.auction.as_ref().map(|a| AuctionView {
        id: a.id,
        facility: String::from(a.kind.name()),
        location: a.location.clone(),
        usage_charge: a.usage_charge,
        suggested_bid: a.suggested_bid,
        turns_remaining: a.turns_remaining,
        your_bid: a
            .bids
            .iter()
            .find(|b| b.player == player_id)
            .map(|b| b.amount),
    });

    Some(PlayerView {
        room: summary,
        you,
        location,
        news: room.news.clone(),
        auction,
        modal: player::peek_modal(p).cloned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tradewinds_types::{Auction, AuctionId, Bid, FacilityKind, Good, Transit};

    use super::*;

    fn setup() -> (Room, PlayerId, PlayerId, GameConfig) {
        let cfg = GameConfig::default();
        let mut room = Room::new(String::from("alpha"), false, None);
        let a = PlayerId::new();
        let b = PlayerId::new();
        room.add_player(a, String::from("Ada"), &cfg).unwrap();
        room.add_player(b, String::from("Brin"), &cfg).unwrap();
        (room, a, b, cfg)
    }

    #[test]
    fn view_hides_other_players_cargo_and_money() {
        let (mut room, a, b, cfg) = setup();
        if let Some(p) = room.players.get_mut(&b) {
            p.cargo.insert(Good::Luxuries, 10);
            p.money = 9_999;
        }
        let view = build_view(&room, a, &cfg).unwrap();
        // The other player appears only as public facts.
        let brin = view
            .room
            .players
            .iter()
            .find(|p| p.name == "Brin")
            .unwrap();
        assert!(!brin.bankrupt);
        // Own detail belongs to the requester.
        assert_eq!(view.you.name, "Ada");
        let serialized = serde_json::to_string(&view).unwrap();
        assert!(!serialized.contains("9999"));
    }

    #[test]
    fn transit_blanks_the_location_view() {
        let (mut room, a, _, cfg) = setup();
        if let Some(p) = room.players.get_mut(&a) {
            p.transit = Some(Transit {
                origin: p.location.clone(),
                remaining: 5,
                total: 10,
            });
        }
        let view = build_view(&room, a, &cfg).unwrap();
        assert!(view.location.is_none());
        // And the player list shows no position while moving.
        let me = view.room.players.iter().find(|p| p.name == "Ada").unwrap();
        assert!(me.location.is_none());
    }

    #[test]
    fn auction_view_shows_only_own_bid() {
        let (mut room, a, b, cfg) = setup();
        room.auction = Some(Auction {
            id: AuctionId::new(),
            kind: FacilityKind::FuelDepot,
            location: String::from("Araxis"),
            usage_charge: 15,
            suggested_bid: 600,
            bids: vec![
                Bid { player: b, amount: 700 },
                Bid { player: a, amount: 650 },
            ],
            turns_remaining: 2,
        });
        let view = build_view(&room, a, &cfg).unwrap();
        let auction = view.auction.unwrap();
        assert_eq!(auction.your_bid, Some(650));
        let serialized = serde_json::to_string(&auction).unwrap();
        assert!(!serialized.contains("700"));
    }

    #[test]
    fn modal_is_the_oldest_pending() {
        let (mut room, a, _, cfg) = setup();
        if let Some(p) = room.players.get_mut(&a) {
            let _ = player::push_modal(p, "first", "x", tradewinds_types::ModalPayload::Plain);
            let _ = player::push_modal(p, "second", "y", tradewinds_types::ModalPayload::Plain);
        }
        let view = build_view(&room, a, &cfg).unwrap();
        assert_eq!(view.modal.map(|m| m.title), Some(String::from("first")));
    }
}
