//! Per-connection handler: decode, dispatch, and outbound delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Derive the player's identity from the connection id
//!   2. Spawn a writer task that drains the player's outbound channel
//!   3. Loop: receive frames → decode [`ClientEvent`] → dispatch
//!   4. On exit, remove the player from their room

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use digitduel_engine::PlayerAction;
use digitduel_protocol::{ClientEvent, Codec, PlayerId, RoomId, ServerEvent};
use digitduel_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::DigitduelError;

/// Channel sender for events addressed to this connection's player.
type OutboundSender = mpsc::UnboundedSender<ServerEvent>;

/// Drop guard that removes a player from their room when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct DisconnectGuard {
    player_id: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut registry = state.registry.lock().await;
            // NotInRoom is normal here: the player never joined.
            let _ = registry.disconnect(player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), DigitduelError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    let conn = Arc::new(conn);
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: the only producer of outbound frames, so unicasts and
    // room broadcasts share one ordered pipeline. It ends when every
    // sender clone is gone (handler returned and room dropped the player).
    let writer_conn = Arc::clone(&conn);
    let codec = state.codec;
    tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let bytes = match codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(%player_id, error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
        let _ = writer_conn.close().await;
    });

    let _guard = DisconnectGuard {
        player_id,
        state: Arc::clone(&state),
    };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode client event");
                continue;
            }
        };

        dispatch(&state, player_id, event, &out_tx).await;
    }

    // _guard drops here → room removal fires.
    Ok(())
}

/// Dispatches one decoded client event.
async fn dispatch(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    event: ClientEvent,
    out_tx: &OutboundSender,
) {
    match event {
        ClientEvent::Join {
            room_id,
            display_name,
        } => {
            let name = display_name.trim();
            if name.is_empty() {
                unicast(out_tx, join_failure("display name is required"));
                return;
            }

            let room_id = match RoomId::parse(&room_id) {
                Ok(room_id) => room_id,
                Err(e) => {
                    unicast(out_tx, join_failure(&e.to_string()));
                    return;
                }
            };

            // On success the room actor unicasts `Joined` itself, before
            // the room-wide state push.
            let result = {
                let mut registry = state.registry.lock().await;
                registry
                    .join(player_id, room_id, name, out_tx.clone())
                    .await
            };
            if let Err(e) = result {
                unicast(out_tx, join_failure(&e.to_string()));
            }
        }

        ClientEvent::SetSecret { secret_number } => {
            route(
                state,
                player_id,
                PlayerAction::SetSecret {
                    secret: secret_number,
                },
            )
            .await;
        }

        ClientEvent::Guess { target_id, guess } => {
            route(
                state,
                player_id,
                PlayerAction::Guess {
                    target: target_id,
                    guess,
                },
            )
            .await;
        }

        ClientEvent::Restart => {
            route(state, player_id, PlayerAction::Restart).await;
        }

        ClientEvent::Status => {
            let (total_rooms, rooms) = {
                let registry = state.registry.lock().await;
                (registry.room_count(), registry.room_ids())
            };
            unicast(
                out_tx,
                ServerEvent::Status {
                    total_rooms,
                    rooms,
                    server_time_ms: now_ms(),
                },
            );
        }
    }
}

/// Routes a gameplay action into the player's room.
///
/// Actions from players who are not in any room have no session to land
/// in and are dropped.
async fn route(state: &Arc<ServerState>, player_id: PlayerId, action: PlayerAction) {
    let result = {
        let registry = state.registry.lock().await;
        registry.route(player_id, action).await
    };
    if let Err(e) = result {
        tracing::debug!(%player_id, error = %e, "dropping unroutable action");
    }
}

/// Queues an event for this connection's writer task. A closed channel
/// means the connection is already going away.
fn unicast(out_tx: &OutboundSender, event: ServerEvent) {
    let _ = out_tx.send(event);
}

fn join_failure(reason: &str) -> ServerEvent {
    ServerEvent::Joined {
        success: false,
        reason: Some(reason.to_string()),
        player_id: None,
        session: None,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
