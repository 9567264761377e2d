//! WebSocket connection lifecycle.
//!
//! Each connection runs a read loop (this function) and one writer
//! task draining a per-connection channel, so broadcasts from the room
//! and direct replies never interleave on the socket. Structurally
//! malformed frames are ignored. When the read loop ends for any
//! reason -- close frame, error, or silence -- the player leaves their
//! room through the same persistence path as a graceful exit.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tradewinds_core::scheduler::{RoomCommand, RoomHandle};
use tradewinds_types::{ClientRequest, PlayerId, ServerMessage};
use tracing::{debug, warn};

use crate::state::AppState;

/// Capacity of each connection's outbound channel. A slow client drops
/// messages and resynchronizes from the next full view.
const OUTBOUND_CAPACITY: usize = 64;

/// What the server knows about one connection.
struct Session {
    /// Identity established by `connect`.
    player_id: Option<PlayerId>,
    /// Display name from `connect`.
    name: String,
    /// The room this connection is currently in.
    room: Option<RoomHandle>,
}

/// Upgrade an HTTP request to a WebSocket game connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Drive one connection until it closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    debug!("client connected");
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);

    // The single writer for this connection.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(err) => {
                    warn!(%err, "outbound message failed to serialize");
                    continue;
                }
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                debug!("client disconnected (send failed)");
                break;
            }
        }
    });

    let mut session = Session {
        player_id: None,
        name: String::new(),
        room: None,
    };

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                match serde_json::from_str::<ClientRequest>(&text) {
                    Ok(request) => handle_request(request, &mut session, &state, &tx).await,
                    Err(err) => {
                        // Malformed frames are ignored, never fatal.
                        debug!(%err, "ignoring malformed frame");
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            // Pings are answered by the protocol layer; binary frames
            // have no meaning here.
            Ok(_) => {}
            Err(err) => {
                debug!(%err, "read error, closing connection");
                break;
            }
        }
    }

    // Connection loss takes the same persistence path as a graceful
    // exit.
    if let (Some(player_id), Some(room)) = (session.player_id, session.room.as_ref()) {
        room.send(RoomCommand::Leave { player_id });
    }
    writer.abort();
    debug!("client gone");
}

/// Send one message to this connection, best effort.
async fn reply(tx: &mpsc::Sender<ServerMessage>, msg: ServerMessage) {
    if tx.send(msg).await.is_err() {
        debug!("reply dropped, connection writer gone");
    }
}

/// Send a notice to this connection.
async fn reply_notice(tx: &mpsc::Sender<ServerMessage>, message: impl Into<String>, error: bool) {
    reply(
        tx,
        ServerMessage::Notice {
            message: message.into(),
            error,
        },
    )
    .await;
}

/// Leave the current room, if any.
fn leave_current(session: &mut Session) {
    if let (Some(player_id), Some(room)) = (session.player_id, session.room.take()) {
        room.send(RoomCommand::Leave { player_id });
    }
}

/// Dispatch one inbound request.
#[allow(clippy::too_many_lines)]
async fn handle_request(
    request: ClientRequest,
    session: &mut Session,
    state: &Arc<AppState>,
    tx: &mpsc::Sender<ServerMessage>,
) {
    // Everything except `connect` requires an identity.
    let Some(player_id) = session.player_id else {
        if let ClientRequest::Connect { name } = request {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                reply_notice(tx, "a name is required", true).await;
                return;
            }
            let id = PlayerId::new();
            session.player_id = Some(id);
            session.name = String::from(trimmed);
            tracing::info!(player = %id, name = %session.name, "player connected");
            reply(
                tx,
                ServerMessage::Welcome {
                    player_id: id,
                    name: session.name.clone(),
                },
            )
            .await;
        } else {
            reply_notice(tx, "connect first", true).await;
        }
        return;
    };

    match request {
        ClientRequest::Connect { .. } => {
            reply_notice(tx, "already connected", true).await;
        }
        ClientRequest::ListRooms => {
            let rooms = state.registry.list().await;
            reply(tx, ServerMessage::RoomList { rooms }).await;
        }
        ClientRequest::CreateRoom { name, private } => {
            leave_current(session);
            let handle = state
                .registry
                .create_room(name, private, Some(player_id))
                .await;
            handle.send(RoomCommand::Join {
                player_id,
                name: session.name.clone(),
                tx: tx.clone(),
            });
            session.room = Some(handle);
        }
        ClientRequest::JoinRoom { room_id } => {
            let Some(handle) = state.registry.get(room_id).await else {
                reply_notice(tx, "no such room", true).await;
                return;
            };
            leave_current(session);
            handle.send(RoomCommand::Join {
                player_id,
                name: session.name.clone(),
                tx: tx.clone(),
            });
            session.room = Some(handle);
        }
        ClientRequest::ExitRoom => {
            leave_current(session);
            reply_notice(tx, "left the room", false).await;
        }
        ClientRequest::RestoreRoom => {
            let Some(handle) = state.registry.restore_saved(player_id).await else {
                reply_notice(tx, "no saved game found", true).await;
                return;
            };
            leave_current(session);
            handle.send(RoomCommand::Join {
                player_id,
                name: session.name.clone(),
                tx: tx.clone(),
            });
            session.room = Some(handle);
        }
        // Everything below is routed into the current room's task.
        ClientRequest::StartGame => {
            route(session, tx, RoomCommand::Start { player_id }).await;
        }
        ClientRequest::AddBot => {
            route(session, tx, RoomCommand::AddBot { player_id }).await;
        }
        ClientRequest::SetReady { ready } => {
            route(session, tx, RoomCommand::SetReady { player_id, ready }).await;
        }
        ClientRequest::SetEndGame { end_game } => {
            route(session, tx, RoomCommand::SetEndGame { player_id, end_game }).await;
        }
        ClientRequest::SetPaused { paused } => {
            route(session, tx, RoomCommand::SetPaused { paused }).await;
        }
        ClientRequest::SelectPlanet { destination } => {
            route(
                session,
                tx,
                RoomCommand::SelectPlanet {
                    player_id,
                    destination,
                },
            )
            .await;
        }
        ClientRequest::Buy { good, amount } => {
            route(session, tx, RoomCommand::Buy { player_id, good, amount }).await;
        }
        ClientRequest::Sell { good, amount } => {
            route(session, tx, RoomCommand::Sell { player_id, good, amount }).await;
        }
        ClientRequest::Refuel { amount } => {
            route(session, tx, RoomCommand::Refuel { player_id, amount }).await;
        }
        ClientRequest::AuctionBid { auction_id, bid } => {
            route(
                session,
                tx,
                RoomCommand::AuctionBid {
                    player_id,
                    auction_id,
                    bid,
                },
            )
            .await;
        }
        ClientRequest::AckModal { id } => {
            route(session, tx, RoomCommand::AckModal { player_id, id }).await;
        }
        ClientRequest::RespondModal { id, accept } => {
            route(session, tx, RoomCommand::RespondModal { player_id, id, accept }).await;
        }
        ClientRequest::GetPlayer { player_id: target } => {
            route(session, tx, RoomCommand::GetPlayer { player_id, target }).await;
        }
    }
}

/// Route a command to the session's current room, or explain why not.
async fn route(session: &Session, tx: &mpsc::Sender<ServerMessage>, cmd: RoomCommand) {
    if let Some(room) = session.room.as_ref() {
        room.send(cmd);
    } else {
        reply_notice(tx, "join a room first", true).await;
    }
}
