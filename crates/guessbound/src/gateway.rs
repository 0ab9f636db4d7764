//! The session gateway: per-connection event dispatch.
//!
//! Each accepted connection gets its own task running
//! [`handle_connection`]. The flow is:
//!
//!   1. Spawn a writer task that forwards this connection's outbound
//!      channel (the end the rooms broadcast into) onto the socket.
//!   2. Loop: receive frames → decode → dispatch one handler per event.
//!   3. On transport disconnect, remove the connection from its room.
//!
//! Handlers are fault-isolated by construction: they validate before
//! mutating, convert every failure into an ack error, and a frame that
//! doesn't decode is logged and dropped — one hostile client cannot take
//! down other rooms' sessions.
//!
//! The acting player is always resolved from the [`ConnectionId`]
//! through the registry — never from any implicit per-connection state.
//! Note the silent paths: a handler returning `None` withholds the ack
//! on purpose (unauthorized or out-of-phase action).

use std::sync::Arc;

use guessbound_protocol::{
    Ack, ClientEvent, ConnectionId, ExplainerAnswer, Role, ServerEvent,
    decode_client, encode_ack, encode_event,
};
use guessbound_room::{
    Disposition, GameError, RoomCode, RoomRegistry, RoundTimer, SharedRegistry,
    schedule_removal,
};
use guessbound_transport::WsConnection;
use guessbound_words::WordSource;
use tokio::sync::mpsc;

/// Shared server state handed to every connection handler.
pub(crate) struct ServerState {
    pub(crate) registry: SharedRegistry,
    pub(crate) words: Arc<WordSource>,
}

/// Channel end the gateway hands to rooms so they can reach this
/// connection.
type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Handles one connection from accept to close.
pub(crate) async fn handle_connection(conn: WsConnection, state: Arc<ServerState>) {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::debug!(%conn_id, "handling new connection");

    // Writer task: everything a room (or this handler) pushes into the
    // channel goes out on the socket, serialized in channel order.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let writer = {
        let conn = Arc::clone(&conn);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match encode_event(&event) {
                    Ok(text) => {
                        if conn.send_text(&text).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode outbound event");
                    }
                }
            }
        })
    };

    loop {
        let text = match conn.recv_text().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let frame = match decode_client(&text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "dropping undecodable frame");
                continue;
            }
        };

        let ack_id = frame.ack;
        let reply = dispatch(&state, conn_id, &tx, frame.event).await;
        if let (Some(id), Some(body)) = (ack_id, reply) {
            send_ack(&conn, id, &body).await;
        }
    }

    // Transport-level disconnect: the connection leaves whatever room it
    // was in (host migration, round abort, and room GC all happen there).
    state.registry.lock().await.leave(conn_id);
    writer.abort();
    tracing::debug!(%conn_id, "connection handler finished");
}

/// Routes one event to its handler. `Some` is the ack body to send (if
/// the client asked for one); `None` means the silent no-op policy.
async fn dispatch(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    tx: &EventSender,
    event: ClientEvent,
) -> Option<Ack> {
    match event {
        ClientEvent::CreateGame { name, custom_code } => {
            Some(create_game(state, conn_id, tx, &name, custom_code.as_deref()).await)
        }
        ClientEvent::JoinGame { code, name } => {
            Some(join_game(state, conn_id, tx, &code, &name).await)
        }
        ClientEvent::StartGame { code } => {
            start_game(state, conn_id, &code).await;
            None // startGame is never acked
        }
        ClientEvent::LeaveRoom { .. } => {
            // The code field is advisory; identity is the connection.
            state.registry.lock().await.leave(conn_id);
            None
        }
        ClientEvent::AssignRole { code, name, role } => {
            assign_role(state, conn_id, &code, &name, role).await
        }
        ClientEvent::SendChat { text } => send_chat(state, conn_id, &text).await,
        ClientEvent::ChooseCustomWord { word } => {
            choose_custom_word(state, conn_id, &word).await
        }
        ClientEvent::ChooseRandomWord => choose_random_word(state, conn_id).await,
        ClientEvent::ExplainerAnswer { answer } => {
            explainer_answer(state, conn_id, answer).await
        }
        ClientEvent::GiveHint => give_hint(state, conn_id).await,
        ClientEvent::ExtendTime => extend_time(state, conn_id).await,
        ClientEvent::GiveUp { reason } => give_up(state, conn_id, &reason).await,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn create_game(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    tx: &EventSender,
    name: &str,
    custom_code: Option<&str>,
) -> Ack {
    let name = name.trim();
    if name.is_empty() {
        return Ack::err(GameError::NameRequired.to_string());
    }

    let mut reg = state.registry.lock().await;
    let code = match reg.create_room(custom_code) {
        Ok(code) => code,
        Err(e) => return Ack::err(e.to_string()),
    };
    if let Err(e) = reg.join(&code, conn_id, name, tx.clone()) {
        // The creator couldn't enter (already in another room): don't
        // leak a hostless empty room.
        reg.remove(&code);
        return Ack::err(e.to_string());
    }
    tracing::info!(room = %code, host = name, "room created");
    Ack::ok_code(code.as_str())
}

async fn join_game(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    tx: &EventSender,
    raw_code: &str,
    name: &str,
) -> Ack {
    let name = name.trim();
    if raw_code.is_empty() || name.is_empty() {
        return Ack::err(GameError::MissingCodeOrName.to_string());
    }
    let code = match RoomCode::parse(raw_code) {
        Ok(code) => code,
        Err(e) => return Ack::err(e.to_string()),
    };

    let mut reg = state.registry.lock().await;
    if reg.room(&code).is_none() {
        // The client shows a dedicated screen for this one.
        let _ = tx.send(ServerEvent::NoGameFound);
        return Ack::err(GameError::RoomNotFound.to_string());
    }
    match reg.join(&code, conn_id, name, tx.clone()) {
        Ok(()) => Ack::ok_code(code.as_str()),
        Err(e) => Ack::err(e.to_string()),
    }
}

async fn start_game(state: &Arc<ServerState>, conn_id: ConnectionId, raw_code: &str) {
    let Ok(code) = RoomCode::parse(raw_code) else {
        return;
    };
    let mut reg = state.registry.lock().await;
    if let Some(room) = reg.room_mut(&code) {
        room.start(conn_id);
    }
}

async fn assign_role(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    raw_code: &str,
    target_name: &str,
    role: Role,
) -> Option<Ack> {
    let code = RoomCode::parse(raw_code).ok()?;
    let mut reg = state.registry.lock().await;
    let room = reg.room_mut(&code)?;
    room.assign_role(conn_id, target_name, role)?;
    Some(Ack::ok())
}

async fn send_chat(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    text: &str,
) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    let disposition = room.submit_chat(conn_id, text)?;
    let code = room.code().clone();
    if disposition == Disposition::RemoveAfterGrace {
        let grace = reg.config().removal_grace;
        schedule_removal(state.registry.clone(), code, grace);
    }
    Some(Ack::ok())
}

async fn choose_custom_word(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    word: &str,
) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    match room.choose_custom_word(conn_id, word) {
        Ok(Some(difficulty)) => {
            let code = room.code().clone();
            arm_round_timer(&mut reg, &state.registry, &code);
            Some(Ack::ok_difficulty(difficulty))
        }
        Ok(None) => None,
        Err(e) => Some(Ack::err(e.to_string())),
    }
}

async fn choose_random_word(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    match room.choose_random_word(conn_id, &state.words) {
        Ok(Some(difficulty)) => {
            let code = room.code().clone();
            arm_round_timer(&mut reg, &state.registry, &code);
            Some(Ack::ok_difficulty(difficulty))
        }
        Ok(None) => None,
        Err(e) => Some(Ack::err(e.to_string())),
    }
}

async fn explainer_answer(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    answer: ExplainerAnswer,
) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    room.explainer_answer(conn_id, answer)?;
    Some(Ack::ok())
}

async fn give_hint(state: &Arc<ServerState>, conn_id: ConnectionId) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    room.give_hint(conn_id)?;
    Some(Ack::ok())
}

async fn extend_time(state: &Arc<ServerState>, conn_id: ConnectionId) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    let seconds = room.extend_time(conn_id)?;
    Some(Ack::ok_seconds(seconds))
}

async fn give_up(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    reason: &str,
) -> Option<Ack> {
    let mut reg = state.registry.lock().await;
    let room = reg.room_of_mut(conn_id)?;
    let disposition = room.give_up(conn_id, reason)?;
    let code = room.code().clone();
    if disposition == Disposition::RemoveAfterGrace {
        let grace = reg.config().removal_grace;
        schedule_removal(state.registry.clone(), code, grace);
    }
    Some(Ack::ok())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Arms the countdown for a freshly started round. Spawned while the
/// registry lock is held, so the first tick cannot race the start.
fn arm_round_timer(reg: &mut RoomRegistry, shared: &SharedRegistry, code: &RoomCode) {
    let timer = RoundTimer::spawn(shared.clone(), code.clone());
    if let Some(room) = reg.room_mut(code) {
        room.set_timer(timer);
    }
}

/// Sends an ack reply directly on the socket.
async fn send_ack(conn: &WsConnection, ack_id: u64, body: &Ack) {
    match encode_ack(ack_id, body) {
        Ok(text) => {
            if let Err(e) = conn.send_text(&text).await {
                tracing::debug!(error = %e, "failed to send ack");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to encode ack"),
    }
}
