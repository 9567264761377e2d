//! The facility and auction subsystem.
//!
//! At most one auction runs per room. Each turn the active auction
//! counts down and resolves at zero: the first strictly-highest
//! recorded bid wins (an equal later bid never displaces an earlier
//! one), the winner is charged, and the facility attaches to its
//! location if the facility cap allows. With no auction active, a new
//! one starts with a small fixed probability. Independently, every
//! facility charges docked non-owners its usage fee and pays the
//! accrued revenue out when the owner docks.

use rand::Rng;
use tradewinds_agents::{player, strategy};
use tradewinds_types::{
    Auction, AuctionId, Bid, Facility, FacilityKind, ModalPayload, PlayerId,
};

use crate::config::GameConfig;
use crate::room::Room;

/// What an auction resolution produced, for logging and summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionResolution {
    /// The winning player and their bid, if anyone bid.
    pub winner: Option<(PlayerId, i64)>,
    /// The facility archetype auctioned.
    pub kind: FacilityKind,
    /// The location it was auctioned for.
    pub location: String,
}

/// Record or raise a player's bid.
///
/// # Errors
///
/// Returns a rejection reason when there is no matching auction or the
/// bid is not positive.
pub fn place_bid(
    room: &mut Room,
    player_id: PlayerId,
    auction_id: AuctionId,
    bid: i64,
) -> Result<(), &'static str> {
    let Some(auction) = room.auction.as_mut() else {
        return Err("no auction is running");
    };
    if auction.id != auction_id {
        return Err("that auction has closed");
    }
    if bid <= 0 {
        return Err("a bid must be a positive amount");
    }
    if let Some(existing) = auction.bids.iter_mut().find(|b| b.player == player_id) {
        existing.amount = bid;
    } else {
        auction.bids.push(Bid {
            player: player_id,
            amount: bid,
        });
    }
    Ok(())
}

/// Advance the auction lifecycle by one turn.
///
/// Returns the resolution if an auction closed this turn.
pub fn advance_auction(
    room: &mut Room,
    rng: &mut impl Rng,
    cfg: &GameConfig,
) -> Option<AuctionResolution> {
    if room.auction.is_some() {
        let done = {
            let Some(auction) = room.auction.as_mut() else {
                return None;
            };
            auction.turns_remaining = auction.turns_remaining.saturating_sub(1);
            auction.turns_remaining == 0
        };
        if done {
            return Some(resolve_auction(room, cfg));
        }
        return None;
    }

    if rng.random_range(0_u32..100) < cfg.auction.start_pct {
        start_auction(room, rng, cfg);
    }
    None
}

/// Resolve the active auction: first strictly-highest bid wins.
fn resolve_auction(room: &mut Room, cfg: &GameConfig) -> AuctionResolution {
    let Some(auction) = room.auction.take() else {
        return AuctionResolution {
            winner: None,
            kind: FacilityKind::Warehouse,
            location: String::new(),
        };
    };

    // Strict greater-than scan in arrival order: ties favor the bid
    // recorded first.
    let mut winner: Option<Bid> = None;
    for bid in &auction.bids {
        let beats = winner.as_ref().is_none_or(|w| bid.amount > w.amount);
        if beats {
            winner = Some(*bid);
        }
    }

    let resolution = AuctionResolution {
        winner: winner.map(|b| (b.player, b.amount)),
        kind: auction.kind,
        location: auction.location.clone(),
    };

    let Some(won) = winner else {
        room.emit_news(
            format!("{} auction at {} closes with no takers", auction.kind, auction.location),
            auction.location.clone(),
        );
        return resolution;
    };

    let _ = room.charge_player(won.player, won.amount, cfg);

    let under_cap = room
        .map
        .get(&auction.location)
        .is_some_and(|loc| loc.facilities.len() < cfg.auction.max_facilities_per_location);
    if under_cap {
        if let Some(loc) = room.map.get_mut(&auction.location) {
            loc.facilities.push(Facility {
                kind: auction.kind,
                owner: won.player,
                usage_charge: auction.usage_charge,
                accrued: 0,
                purchase_price: won.amount,
            });
        }
    } else {
        tracing::warn!(room = %room.id, location = %auction.location, "facility cap reached at resolution, deed voided");
    }

    let winner_name = room
        .players
        .get(&won.player)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| String::from("A stranger"));
    room.emit_news(
        format!(
            "{winner_name} wins the {} at {} for {}",
            auction.kind, auction.location, won.amount
        ),
        auction.location,
    );
    if let Some(p) = room.players.get_mut(&won.player) {
        player::record_history(p, format!("Won {} auction for {}", auction.kind, won.amount));
    }

    resolution
}

/// Start a new auction at a random eligible location.
fn start_auction(room: &mut Room, rng: &mut impl Rng, cfg: &GameConfig) {
    let eligible: Vec<String> = room
        .map
        .iter()
        .filter(|(_, loc)| loc.facilities.len() < cfg.auction.max_facilities_per_location)
        .map(|(name, _)| name.clone())
        .collect();
    if eligible.is_empty() {
        return;
    }
    let location = eligible
        .get(rng.random_range(0..eligible.len()))
        .cloned()
        .unwrap_or_default();

    let kind = FacilityKind::ALL
        .get(rng.random_range(0..FacilityKind::ALL.len()))
        .copied()
        .unwrap_or(FacilityKind::Warehouse);

    let (charge_lo, charge_hi) = kind.usage_charge_range();
    let usage_charge = rng.random_range(charge_lo..=charge_hi.max(charge_lo));

    let jitter_span = kind
        .base_value()
        .saturating_mul(i64::from(cfg.auction.suggested_bid_jitter_pct))
        .checked_div(100)
        .unwrap_or(0);
    let jitter = if jitter_span > 0 {
        rng.random_range(jitter_span.saturating_neg()..=jitter_span)
    } else {
        0
    };
    let suggested_bid = kind.base_value().saturating_add(jitter).max(1);

    let auction = Auction {
        id: AuctionId::new(),
        kind,
        location: location.clone(),
        usage_charge,
        suggested_bid,
        bids: Vec::new(),
        turns_remaining: cfg.auction.duration_turns,
    };
    let auction_id = auction.id;
    room.auction = Some(auction);

    tracing::debug!(room = %room.id, %location, kind = %kind, suggested_bid, "auction started");

    // Bots place their one automatic bid up front; humans get a prompt.
    let ids: Vec<PlayerId> = room.players.keys().copied().collect();
    for id in ids {
        let Some(p) = room.players.get(&id) else {
            continue;
        };
        if p.bankrupt {
            continue;
        }
        if p.is_bot {
            if let Some(bid) = strategy::auction_bid(p, suggested_bid, &cfg.strategy, rng) {
                let _ = place_bid(room, id, auction_id, bid);
            }
        } else if let Some(p) = room.players.get_mut(&id) {
            player::push_modal(
                p,
                "Auction",
                format!("A {kind} at {location} is up for auction. Suggested bid: {suggested_bid}."),
                ModalPayload::AuctionPrompt {
                    auction_id,
                    suggested_bid,
                },
            );
        }
    }
}

/// Charge docked non-owners every facility's usage fee and pay owners
/// their accrued revenue when they dock.
pub fn charge_facilities(room: &mut Room, cfg: &GameConfig) {
    // Snapshot the fee schedule first; charges mutate players and the
    // bankruptcy path mutates the news list.
    let schedule: Vec<(String, usize, PlayerId, i64)> = room
        .map
        .iter()
        .flat_map(|(name, loc)| {
            loc.facilities
                .iter()
                .enumerate()
                .map(|(idx, f)| (name.clone(), idx, f.owner, f.usage_charge))
        })
        .collect();

    for (location, idx, owner, usage_charge) in schedule {
        let docked: Vec<PlayerId> = room
            .players
            .values()
            .filter(|p| {
                !p.bankrupt && p.transit.is_none() && p.location == location && p.id != owner
            })
            .map(|p| p.id)
            .collect();

        let mut collected: i64 = 0;
        for id in docked {
            let _ = room.charge_player(id, usage_charge, cfg);
            collected = collected.saturating_add(usage_charge);
        }
        if collected > 0 {
            if let Some(f) = room
                .map
                .get_mut(&location)
                .and_then(|loc| loc.facilities.get_mut(idx))
            {
                f.accrued = f.accrued.saturating_add(collected);
            }
        }

        // Owner docked here: pay out the till.
        let owner_docked = room
            .players
            .get(&owner)
            .is_some_and(|p| !p.bankrupt && p.transit.is_none() && p.location == location);
        if owner_docked {
            let payout = room
                .map
                .get_mut(&location)
                .and_then(|loc| loc.facilities.get_mut(idx))
                .map(|f| std::mem::take(&mut f.accrued))
                .unwrap_or(0);
            if payout > 0 {
                if let Some(p) = room.players.get_mut(&owner) {
                    player::credit(p, payout);
                    player::record_history(p, format!("Collected {payout} from facility at {location}"));
                }
            }
        }
    }
}
