use crate::domain::PlayerId;
use crate::interface_adapters::protocol::{ClientMessage, GameStateDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ArenaHandle, GameEvent, WorldUpdate};

use axum::{
    Error,
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::{IntoResponse, Response},
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each world update once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let tick = update.tick;
                let msg = ServerMessage::GameState(GameStateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(tick, error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_world_serializer(arena: &ArenaHandle) {
    tokio::spawn(world_update_serializer(
        arena.world_tx.subscribe(),
        arena.world_bytes_tx.clone(),
        arena.world_latest_tx.clone(),
    ));
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    upgrade(ws, &state)
}

/// Completes the WebSocket upgrade and hands the socket to a connection task.
pub fn upgrade(ws: WebSocketUpgrade, state: &AppState) -> Response {
    let arena = state.arena.clone();
    ws.on_upgrade(move |socket| {
        // Identity is allocated per connection and lives as long as it does.
        let player_id: PlayerId = Uuid::new_v4().to_string();
        let span = info_span!("conn", %player_id);
        handle_socket(socket, arena, player_id).instrument(span)
    })
    .into_response()
}

async fn handle_socket(mut socket: WebSocket, arena: ArenaHandle, player_id: PlayerId) {
    let mut ctx = match bootstrap_connection(&mut socket, &arena, player_id).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket.close().await;
            return;
        }
    };

    info!("client connected");

    // Main Client Loop
    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    if let Err(err) = socket.close().await.map_err(NetError::Ws) {
        debug!(error = ?err, "socket close error");
    }

    if let Err(e) = disconnect_cleanup(&ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket.send(Message::Text(txt.into())).await?;
    Ok(bytes)
}

#[derive(Debug, Default)]
struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_msgs: u32,
    lag_recovery_count: u64,
}

struct ConnCtx {
    player_id: PlayerId,
    input_tx: mpsc::Sender<GameEvent>,
    world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    world_latest_rx: watch::Receiver<Utf8Bytes>,
    stats: ConnStats,

    last_input_full_log: Instant,
    last_world_lag_log: Instant,
    last_invalid_input_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    arena: &ArenaHandle,
    player_id: PlayerId,
) -> Result<ConnCtx, NetError> {
    // Subscribe to updates *before* doing anything else (awaits) to not miss packets.
    let world_bytes_rx = arena.world_bytes_tx.subscribe();
    let world_latest_rx = arena.world_latest_tx.subscribe();

    // Send Identity Packet
    // Only this socket learns its id; everyone else sees it in the next game state.
    let identity_msg = ServerMessage::AssignId {
        id: player_id.clone(),
    };
    let identity_bytes = send_message(socket, &identity_msg).await?;

    // Notify World Task
    // The world task spawns the entity and broadcasts straight away.
    arena
        .input_tx
        .send(GameEvent::Join {
            player_id: player_id.clone(),
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        input_tx: arena.input_tx.clone(),
        world_bytes_rx,
        world_latest_rx,
        stats: ConnStats {
            msgs_out: 1,
            bytes_out: identity_bytes as u64,
            ..Default::default()
        },

        last_input_full_log: now,
        last_world_lag_log: now,
        last_invalid_input_log: now,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    loop {
        let control = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => ctx.handle_incoming(incoming).await?,

            // Outgoing World Update
            world_msg = ctx.world_bytes_rx.recv() => match world_msg {
                Ok(bytes) => forward_world_bytes(bytes, socket, &mut ctx.stats).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    if should_log(&mut ctx.last_world_lag_log) {
                        warn!(missed = n, "world updates lagged; sending snapshot");
                    }

                    // Drop the stale backlog; every update is full state, so the
                    // latest one is a complete resync.
                    ctx.world_bytes_rx = ctx.world_bytes_rx.resubscribe();
                    let latest = ctx.world_latest_rx.borrow().clone();
                    if latest.is_empty() {
                        LoopControl::Continue
                    } else {
                        ctx.stats.lag_recovery_count += 1;
                        forward_world_bytes(latest, socket, &mut ctx.stats).await
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(NetError::WorldUpdatesClosed);
                }
            },
        };

        if let LoopControl::Disconnect = control {
            return Ok(());
        }
    }
}

impl ConnCtx {
    async fn handle_incoming(
        &mut self,
        incoming: Option<Result<Message, Error>>,
    ) -> Result<LoopControl, NetError> {
        match incoming {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    self.stats.msgs_in += 1;
                    self.stats.bytes_in += text.len() as u64;
                    self.dispatch(text.as_str()).await?;
                    Ok(LoopControl::Continue)
                }
                Message::Binary(bytes) => {
                    // Not part of the protocol; ignored like any other malformed input.
                    self.stats.msgs_in += 1;
                    self.stats.bytes_in += bytes.len() as u64;
                    self.stats.invalid_msgs += 1;
                    if should_log(&mut self.last_invalid_input_log) {
                        warn!(bytes = bytes.len(), "binary message ignored");
                    }
                    Ok(LoopControl::Continue)
                }
                Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
                Message::Close(_) => Ok(LoopControl::Disconnect),
            },
            Some(Err(e)) => {
                warn!(error = %e, "websocket recv error");
                Ok(LoopControl::Disconnect)
            }
            None => {
                info!("websocket closed");
                Ok(LoopControl::Disconnect)
            }
        }
    }

    /// Translates one text frame into a world event. Malformed input is never fatal.
    async fn dispatch(&mut self, text: &str) -> Result<(), NetError> {
        let player_id = self.player_id.clone();
        let event = match ClientMessage::parse(text) {
            Ok(ClientMessage::Input(input)) => {
                return self.send_input(GameEvent::Input {
                    player_id,
                    intent: input.into(),
                });
            }
            Ok(ClientMessage::PlaceBlock) => GameEvent::PlaceMark { player_id },
            Ok(ClientMessage::SetAppearance(appearance)) => GameEvent::SetAppearance {
                player_id,
                update: appearance.into(),
            },
            Ok(ClientMessage::Unrecognized(kind)) => {
                self.stats.invalid_msgs += 1;
                if should_log(&mut self.last_invalid_input_log) {
                    warn!(%kind, "unknown message type ignored");
                }
                return Ok(());
            }
            Err(parse_err) => {
                self.stats.invalid_msgs += 1;
                if should_log(&mut self.last_invalid_input_log) {
                    warn!(
                        bytes = text.len(),
                        error = %parse_err,
                        "failed to parse client message"
                    );
                }
                return Ok(());
            }
        };

        // Discrete events are rare and must not be lost.
        self.input_tx
            .send(event)
            .await
            .map_err(|_| NetError::InputClosed)
    }

    fn send_input(&mut self, event: GameEvent) -> Result<(), NetError> {
        // Clients resend intent continuously, so a full queue only drops a stale sample.
        match self.input_tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_evt)) => {
                if should_log(&mut self.last_input_full_log) {
                    warn!("input channel full; dropping input");
                }
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
        }
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    stats: &mut ConnStats,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket
        .send(Message::Text(world_msg))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            stats.msgs_out += 1;
            stats.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // The peer is gone or going; only this connection is affected.
            warn!(error = ?err, "failed to send world update");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &ConnCtx) -> Result<(), NetError> {
    // Despawn even after transport errors; the world ignores repeats.
    ctx.input_tx
        .send(GameEvent::Leave {
            player_id: ctx.player_id.clone(),
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let ConnStats {
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_msgs,
        lag_recovery_count,
    } = ctx.stats;
    debug!(
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_msgs,
        lag_recovery_count,
        "connection stats"
    );
    info!("client disconnected");
    Ok(())
}
