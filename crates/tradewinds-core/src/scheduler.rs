//! The per-room scheduler: one single-writer task owns each room.
//!
//! Nothing outside the task ever touches a [`Room`]. Connections hold a
//! [`RoomHandle`] -- a bounded command channel plus a lock-free metadata
//! block for listings -- and every request becomes a [`RoomCommand`].
//! The task loops on `select!` over the turn-deadline timer and the
//! command channel:
//!
//! - the timer advances the turn when the room is started and unpaused
//!   (bot-only rooms pace on a short poll interval instead of the
//!   human turn length);
//! - a command mutates the room, and if it leaves every connected human
//!   ready, the turn advances immediately;
//! - `Close` (or every handle dropping) terminates the loop. Closing is
//!   idempotent: further commands simply find the channel gone.
//!
//! After every state-affecting command and every advance, each
//! connected player gets a freshly built view.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tradewinds_types::{
    AuctionId, Good, ModalId, PlayerId, PlayerPublic, RoomId, RoomInfo, ServerMessage,
};

use crate::auction;
use crate::config::GameConfig;
use crate::error::RoomError;
use crate::events;
use crate::room::Room;
use crate::tick::{self, TurnSummary};
use crate::trade;
use crate::travel;
use crate::view;

/// Capacity of each room's command channel. A full channel drops the
/// command; the client resynchronizes on the next broadcast.
pub const COMMAND_CAPACITY: usize = 64;

/// A command delivered to a room's scheduler task.
#[derive(Debug)]
pub enum RoomCommand {
    /// Attach a player (new, reconnecting, or rejoining a saved seat).
    Join {
        /// The joining player.
        player_id: PlayerId,
        /// Display name for a first-time join.
        name: String,
        /// The player's outbound message channel.
        tx: mpsc::Sender<ServerMessage>,
    },
    /// Detach a player, persisting their seat. Graceful exit and
    /// connection loss are the same path.
    Leave {
        /// The leaving player.
        player_id: PlayerId,
    },
    /// Start the game.
    Start {
        /// The requesting player.
        player_id: PlayerId,
    },
    /// Add a trading-agent player.
    AddBot {
        /// The requesting player.
        player_id: PlayerId,
    },
    /// Set a player's early-end ready flag.
    SetReady {
        /// The requesting player.
        player_id: PlayerId,
        /// The new ready state.
        ready: bool,
    },
    /// Set a player's end-game vote.
    SetEndGame {
        /// The requesting player.
        player_id: PlayerId,
        /// The new vote.
        end_game: bool,
    },
    /// Choose a travel destination.
    SelectPlanet {
        /// The requesting player.
        player_id: PlayerId,
        /// Destination location name.
        destination: String,
    },
    /// Buy a good.
    Buy {
        /// The requesting player.
        player_id: PlayerId,
        /// The good to buy.
        good: Good,
        /// Requested amount (clamped).
        amount: u32,
    },
    /// Sell a good.
    Sell {
        /// The requesting player.
        player_id: PlayerId,
        /// The good to sell.
        good: Good,
        /// Requested amount (clamped).
        amount: u32,
    },
    /// Buy fuel.
    Refuel {
        /// The requesting player.
        player_id: PlayerId,
        /// Requested units (clamped).
        amount: u32,
    },
    /// Place or raise an auction bid.
    AuctionBid {
        /// The requesting player.
        player_id: PlayerId,
        /// The auction being bid on.
        auction_id: AuctionId,
        /// Bid amount.
        bid: i64,
    },
    /// Acknowledge a plain modal.
    AckModal {
        /// The requesting player.
        player_id: PlayerId,
        /// The modal being acknowledged.
        id: ModalId,
    },
    /// Accept or decline an offer modal.
    RespondModal {
        /// The requesting player.
        player_id: PlayerId,
        /// The modal being answered.
        id: ModalId,
        /// `true` to accept.
        accept: bool,
    },
    /// Query another player's public info.
    GetPlayer {
        /// The requesting player.
        player_id: PlayerId,
        /// The player being queried.
        target: PlayerId,
    },
    /// Pause or resume the room. Idempotent.
    SetPaused {
        /// The new paused state.
        paused: bool,
    },
    /// Close the room. Idempotent.
    Close,
}

/// Lock-free metadata about a room, readable without its task.
#[derive(Debug)]
pub struct RoomMeta {
    /// Room name.
    pub name: String,
    /// Privacy flag.
    pub private: bool,
    /// Whether the game has started.
    pub started: AtomicBool,
    /// Current player count.
    pub players: AtomicU32,
    /// Current turn.
    pub turn: AtomicU64,
}

impl RoomMeta {
    /// Build the listing row for this room.
    pub fn info(&self, id: RoomId) -> RoomInfo {
        RoomInfo {
            id,
            name: self.name.clone(),
            private: self.private,
            started: self.started.load(Ordering::Acquire),
            players: self.players.load(Ordering::Acquire),
            turn: self.turn.load(Ordering::Acquire),
        }
    }
}

/// The externally held handle to a running room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    /// Room identity.
    pub id: RoomId,
    /// Lock-free metadata for listings.
    pub meta: Arc<RoomMeta>,
    /// The command channel into the scheduler task.
    pub tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Best-effort command send: a full or closed channel drops the
    /// command, matching the non-blocking signal semantics.
    pub fn send(&self, cmd: RoomCommand) {
        if let Err(err) = self.tx.try_send(cmd) {
            tracing::debug!(room = %self.id, %err, "room command dropped");
        }
    }
}

/// Callback invoked as the room's life progresses.
///
/// The server uses this to persist private rooms after every turn and
/// on close; tests use [`NoOpCallback`].
pub trait TurnCallback: Send {
    /// Called after a turn completes.
    fn on_turn(&mut self, room: &Room, summary: &TurnSummary);

    /// Called once when the room's task is about to exit.
    fn on_close(&mut self, _room: &Room) {}
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _room: &Room, _summary: &TurnSummary) {}
}

/// Spawn a room's scheduler task.
///
/// Returns the handle for callers and the join handle the registry
/// awaits (with a grace timeout) when closing or replacing the room.
pub fn spawn_room(
    room: Room,
    cfg: Arc<GameConfig>,
    callback: Box<dyn TurnCallback>,
) -> (RoomHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
    let meta = Arc::new(RoomMeta {
        name: room.name.clone(),
        private: room.private,
        started: AtomicBool::new(room.started),
        players: AtomicU32::new(room.player_count()),
        turn: AtomicU64::new(room.turn),
    });
    let handle = RoomHandle {
        id: room.id,
        meta: Arc::clone(&meta),
        tx,
    };
    let task = tokio::spawn(run_room(room, rx, cfg, meta, callback));
    (handle, task)
}

/// The scheduler loop. Exclusive owner of the room.
async fn run_room(
    mut room: Room,
    mut rx: mpsc::Receiver<RoomCommand>,
    cfg: Arc<GameConfig>,
    meta: Arc<RoomMeta>,
    mut callback: Box<dyn TurnCallback>,
) {
    let mut conns: BTreeMap<PlayerId, mpsc::Sender<ServerMessage>> = BTreeMap::new();
    let mut rng = SmallRng::from_os_rng();
    tracing::info!(room = %room.id, name = %room.name, "room task started");

    loop {
        let wait = wait_duration(&room, &cfg);
        tokio::select! {
            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break };
                if matches!(cmd, RoomCommand::Close) {
                    break;
                }
                let closing = handle_command(&mut room, cmd, &mut conns, &mut rng, &cfg);

                if room.started && !room.paused && room.all_humans_ready() {
                    advance(&mut room, &mut rng, &cfg, callback.as_mut());
                }
                if room.started && room.end_game_agreed() {
                    finish_game(&mut room);
                }
                update_meta(&room, &meta);
                broadcast(&room, &conns, &cfg);
                if closing {
                    break;
                }
            }
            () = tokio::time::sleep(wait) => {
                if room.started && !room.paused {
                    advance(&mut room, &mut rng, &cfg, callback.as_mut());
                    update_meta(&room, &meta);
                    broadcast(&room, &conns, &cfg);
                }
            }
        }
    }

    callback.on_close(&room);
    tracing::info!(room = %room.id, "room task exited");
}

/// How long the scheduler sleeps before the next timer wake.
fn wait_duration(room: &Room, cfg: &GameConfig) -> Duration {
    if !room.started || room.paused {
        // Nothing advances on a timer; commands wake us.
        return Duration::from_secs(3600);
    }
    if room.bots_only() {
        return Duration::from_millis(cfg.rules.bot_turn_ms);
    }
    let Some(deadline) = room.turn_deadline else {
        return Duration::from_secs(cfg.rules.turn_seconds);
    };
    let remaining = deadline
        .signed_duration_since(chrono::Utc::now())
        .num_milliseconds();
    Duration::from_millis(u64::try_from(remaining.max(0)).unwrap_or(0))
}

/// Advance the room by one turn and inform the callback.
fn advance(room: &mut Room, rng: &mut SmallRng, cfg: &GameConfig, callback: &mut dyn TurnCallback) {
    let summary = tick::run_turn(room, rng, cfg);
    callback.on_turn(room, &summary);
}

/// Mirror the room's listing facts into the shared metadata.
fn update_meta(room: &Room, meta: &RoomMeta) {
    meta.started.store(room.started, Ordering::Release);
    meta.players.store(room.player_count(), Ordering::Release);
    meta.turn.store(room.turn, Ordering::Release);
}

/// Push a fresh view to every connected player.
fn broadcast(room: &Room, conns: &BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>, cfg: &GameConfig) {
    for (player_id, tx) in conns {
        if let Some(view) = view::build_view(room, *player_id, cfg) {
            let _ = tx.try_send(ServerMessage::View(Box::new(view)));
        }
    }
}

/// Send a notice to one player, best effort.
fn notice(
    conns: &BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
    player_id: PlayerId,
    message: impl Into<String>,
    error: bool,
) {
    if let Some(tx) = conns.get(&player_id) {
        let _ = tx.try_send(ServerMessage::Notice {
            message: message.into(),
            error,
        });
    }
}

/// The end of the game: final standings for everyone, clock stopped.
fn finish_game(room: &mut Room) {
    let mut standings: Vec<(String, i64)> = room
        .players
        .values()
        .map(|p| (p.name.clone(), tradewinds_agents::player::net_worth(p)))
        .collect();
    standings.sort_by_key(|(_, worth)| core::cmp::Reverse(*worth));
    let mut body = String::from("Final standings:\n");
    for (rank, (name, worth)) in standings.iter().enumerate() {
        body.push_str(&format!("{}. {name} -- {worth} credits\n", rank.saturating_add(1)));
    }
    let ids: Vec<PlayerId> = room.players.keys().copied().collect();
    for id in ids {
        if let Some(p) = room.players.get_mut(&id) {
            let _ = tradewinds_agents::player::push_modal(
                p,
                "The game is over",
                body.clone(),
                tradewinds_types::ModalPayload::Plain,
            );
        }
    }
    room.started = false;
    room.turn_deadline = None;
    tracing::info!(room = %room.id, "game finished by unanimous vote");
}

/// Apply one command. Returns `true` if the room should close.
#[allow(clippy::too_many_lines)]
fn handle_command(
    room: &mut Room,
    cmd: RoomCommand,
    conns: &mut BTreeMap<PlayerId, mpsc::Sender<ServerMessage>>,
    rng: &mut SmallRng,
    cfg: &GameConfig,
) -> bool {
    match cmd {
        RoomCommand::Join { player_id, name, tx } => {
            let result = if room.players.contains_key(&player_id) {
                // Reconnect to a live seat.
                if let Some(p) = room.players.get_mut(&player_id) {
                    p.connected = true;
                }
                Ok(())
            } else if room.saved_players.contains_key(&player_id) {
                room.rejoin(player_id)
            } else {
                room.add_player(player_id, name, cfg)
            };
            match result {
                Ok(()) => {
                    conns.insert(player_id, tx);
                }
                Err(err) => {
                    let _ = tx.try_send(ServerMessage::Notice {
                        message: err.to_string(),
                        error: true,
                    });
                }
            }
        }
        RoomCommand::Leave { player_id } => {
            conns.remove(&player_id);
            match room.persist_and_remove(player_id) {
                Ok(()) | Err(RoomError::UnknownPlayer(_)) => {}
                Err(err) => {
                    tracing::warn!(room = %room.id, %err, "leave failed");
                }
            }
            if room.players.is_empty() && room.saved_players.is_empty() {
                return true;
            }
        }
        RoomCommand::Start { player_id } => {
            match room.start(cfg) {
                Ok(()) => {
                    room.emit_news(
                        "Trade lanes open: may the sharpest margin win",
                        room.name.clone(),
                    );
                }
                Err(err) => notice(conns, player_id, err.to_string(), true),
            }
        }
        RoomCommand::AddBot { player_id } => {
            if let Err(err) = room.add_bot(cfg) {
                notice(conns, player_id, err.to_string(), true);
            }
        }
        RoomCommand::SetReady { player_id, ready } => {
            if let Some(p) = room.players.get_mut(&player_id) {
                p.ready = ready;
            }
        }
        RoomCommand::SetEndGame { player_id, end_game } => {
            if let Some(p) = room.players.get_mut(&player_id) {
                p.end_game = end_game;
            }
        }
        RoomCommand::SelectPlanet { player_id, destination } => {
            if let Some(reason) = room.action_block(player_id) {
                notice(conns, player_id, reason, true);
            } else if let Err(reason) = travel::select_destination(room, player_id, &destination) {
                notice(conns, player_id, reason, true);
            }
        }
        RoomCommand::Buy { player_id, good, amount } => {
            if !room.started {
                notice(conns, player_id, "the game has not started", true);
            } else if let Some(reason) = room.action_block(player_id) {
                notice(conns, player_id, reason, true);
            } else {
                let outcome = trade::buy(room, player_id, good, amount, cfg);
                notice(
                    conns,
                    player_id,
                    format!("Bought {} {good} for {}", outcome.amount, outcome.total),
                    false,
                );
            }
        }
        RoomCommand::Sell { player_id, good, amount } => {
            if !room.started {
                notice(conns, player_id, "the game has not started", true);
            } else if let Some(reason) = room.action_block(player_id) {
                notice(conns, player_id, reason, true);
            } else {
                let outcome = trade::sell(room, player_id, good, amount, cfg);
                notice(
                    conns,
                    player_id,
                    format!("Sold {} {good} for {}", outcome.amount, outcome.total),
                    false,
                );
            }
        }
        RoomCommand::Refuel { player_id, amount } => {
            if let Some(reason) = room.action_block(player_id) {
                notice(conns, player_id, reason, true);
            } else {
                let outcome = trade::refuel(room, player_id, amount, cfg);
                notice(
                    conns,
                    player_id,
                    format!("Refueled {} units for {}", outcome.amount, outcome.total),
                    false,
                );
            }
        }
        RoomCommand::AuctionBid { player_id, auction_id, bid } => {
            let bankrupt = room
                .players
                .get(&player_id)
                .is_some_and(|p| p.bankrupt);
            if bankrupt {
                notice(conns, player_id, "you are bankrupt and can only observe", true);
            } else {
                match auction::place_bid(room, player_id, auction_id, bid) {
                    Ok(()) => notice(conns, player_id, format!("Bid of {bid} recorded"), false),
                    Err(reason) => notice(conns, player_id, reason, true),
                }
            }
        }
        RoomCommand::AckModal { player_id, id } => {
            // Acknowledging is never accepting: an acked offer is
            // declined, a plain modal just leaves the queue.
            let _ = events::resolve_modal(room, player_id, id, false, rng, cfg);
        }
        RoomCommand::RespondModal { player_id, id, accept } => {
            if let Some(message) = events::resolve_modal(room, player_id, id, accept, rng, cfg) {
                notice(conns, player_id, message, false);
            }
        }
        RoomCommand::GetPlayer { player_id, target } => {
            if let Some(p) = room.players.get(&target) {
                let info = PlayerPublic {
                    id: p.id,
                    name: p.name.clone(),
                    is_bot: p.is_bot,
                    connected: p.connected,
                    location: p.transit.is_none().then(|| p.location.clone()),
                    bankrupt: p.bankrupt,
                    ready: p.ready,
                };
                if let Some(tx) = conns.get(&player_id) {
                    let _ = tx.try_send(ServerMessage::PlayerInfo(info));
                }
            } else {
                notice(conns, player_id, "no such player", true);
            }
        }
        RoomCommand::SetPaused { paused } => {
            room.paused = paused;
            tracing::info!(room = %room.id, paused, "pause state changed");
        }
        RoomCommand::Close => return true,
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn join_cmd(id: PlayerId, name: &str) -> (RoomCommand, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(16);
        (
            RoomCommand::Join {
                player_id: id,
                name: String::from(name),
                tx,
            },
            rx,
        )
    }

    async fn drain_views(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn all_ready_advances_exactly_one_turn() {
        let cfg = Arc::new(GameConfig::default());
        let room = Room::new(String::from("alpha"), false, None);
        let (handle, task) = spawn_room(room, Arc::clone(&cfg), Box::new(NoOpCallback));

        let a = PlayerId::new();
        let (join, mut rx) = join_cmd(a, "Ada");
        handle.send(join);
        handle.send(RoomCommand::Start { player_id: a });
        handle.send(RoomCommand::SetReady { player_id: a, ready: true });

        // Give the task a moment to process.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.meta.turn.load(Ordering::Acquire), 1);

        // Ready was reset by the advance; no second turn on its own.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.meta.turn.load(Ordering::Acquire), 1);

        let _ = drain_views(&mut rx).await;
        handle.send(RoomCommand::Close);
        let _ = tokio::time::timeout(Duration::from_secs(1), task).await;
    }

    #[tokio::test]
    async fn bot_only_room_paces_itself() {
        let cfg = Arc::new(GameConfig::default());
        let mut room = Room::new(String::from("alpha"), false, None);
        let _ = room.add_bot(&cfg).unwrap();
        room.started = true;
        let (handle, task) = spawn_room(room, Arc::clone(&cfg), Box::new(NoOpCallback));

        tokio::time::sleep(Duration::from_millis(900)).await;
        let turn = handle.meta.turn.load(Ordering::Acquire);
        assert!(turn >= 2, "bot-only room advanced only {turn} turns");

        handle.send(RoomCommand::Close);
        let _ = tokio::time::timeout(Duration::from_secs(1), task).await;
    }

    #[tokio::test]
    async fn paused_room_does_not_advance() {
        let cfg = Arc::new(GameConfig::default());
        let mut room = Room::new(String::from("alpha"), false, None);
        let _ = room.add_bot(&cfg).unwrap();
        room.started = true;
        room.paused = true;
        let (handle, task) = spawn_room(room, Arc::clone(&cfg), Box::new(NoOpCallback));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(handle.meta.turn.load(Ordering::Acquire), 0);

        // Resume: the poll interval takes over.
        handle.send(RoomCommand::SetPaused { paused: false });
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(handle.meta.turn.load(Ordering::Acquire) >= 1);

        handle.send(RoomCommand::Close);
        let _ = tokio::time::timeout(Duration::from_secs(1), task).await;
    }

    #[tokio::test]
    async fn last_leave_closes_the_room() {
        let cfg = Arc::new(GameConfig::default());
        let room = Room::new(String::from("alpha"), false, None);
        let (handle, task) = spawn_room(room, Arc::clone(&cfg), Box::new(NoOpCallback));

        let a = PlayerId::new();
        let (join, _rx) = join_cmd(a, "Ada");
        handle.send(join);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // A human seat persists on leave, so the room stays up...
        handle.send(RoomCommand::Leave { player_id: a });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        handle.send(RoomCommand::Close);
        let _ = tokio::time::timeout(Duration::from_secs(1), task).await;
    }
}
