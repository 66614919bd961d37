//! WebSocket listener and per-connection message loop.
//!
//! Each accepted TCP stream is upgraded on its own task, so a slow or broken
//! handshake never holds up the accept loop.

use crate::config::ReceiverConfig;
use crate::control::ControlState;
use crate::error::receiver::ReceiverError;
use crate::protocol::{decode_command, decode_frame};
use crate::receiver::handle::ReceiverHandle;
use crate::receiver::{ConnectionPhase, ConnectionState};

use common::ErrorLocation;

use std::net::SocketAddr;
use std::panic::Location;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn as TokioSpawn;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{WebSocketStream, accept_async};
use uuid::Uuid;

/// Longest slice of a rejected message copied into the error log.
const RAW_PREVIEW_CHARS: usize = 256;

/// Pause after a failed `accept()` so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    idle_timeout: Option<Duration>,
}

/// Starts the receiver on `config.listen.host:config.listen.port`.
///
/// Binds the listener, then spawns a background task that accepts
/// connections forever. Every connection shares `control_state`.
///
/// Port 0 binds an ephemeral port; read it back with
/// [`ReceiverHandle::local_addr`].
///
/// # Errors
///
/// Returns [`ReceiverError::Io`] if:
/// - Port is already in use
/// - Insufficient permissions to bind port
/// - Host does not resolve to a local interface
pub async fn start_receiver(
    config: &ReceiverConfig,
    control_state: ControlState,
) -> Result<ReceiverHandle, ReceiverError> {
    let listener = TcpListener::bind((config.listen.host.as_str(), config.listen.port)).await?;
    let local_addr = listener.local_addr()?;

    info!("Server started on ws://{}", local_addr);

    let settings = ConnectionSettings {
        idle_timeout: config.connection.idle_timeout(),
    };
    if let Some(limit) = settings.idle_timeout {
        info!("Idle connections close after {}s", limit.as_secs());
    }

    let accept_task = TokioSpawn(accept_loop(listener, control_state, settings));

    Ok(ReceiverHandle::new(local_addr, accept_task))
}

async fn accept_loop(listener: TcpListener, control_state: ControlState, settings: ConnectionSettings) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("Client connecting from {}", addr);
                TokioSpawn(handle_connection(
                    stream,
                    addr,
                    control_state.clone(),
                    settings,
                ));
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Handles a single WebSocket connection from handshake to close.
///
/// # Errors
///
/// - [`ReceiverError::Handshake`] - WebSocket upgrade failed
/// - [`ReceiverError::Transport`] - reading a frame failed or the peer vanished
/// - [`ReceiverError::IdleTimeout`] - no frame within the configured limit
/// - [`ReceiverError::Protocol`] - a message could not be decoded
///
/// Every error is logged here. The returned value only matters to callers
/// that await the task directly.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    control_state: ControlState,
    settings: ConnectionSettings,
) -> Result<(), ReceiverError> {
    let mut ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            error!("WebSocket handshake with {} failed: {}", addr, e);
            return Err(ReceiverError::Handshake {
                message: format!("WebSocket handshake failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let mut state = ConnectionState::new(Uuid::new_v4(), addr);
    info!("Client connected: {} (connection {})", addr, state.id());
    state.transition(ConnectionPhase::AwaitingMessage);

    let result = receive_loop(&mut ws_stream, &mut state, &control_state, settings).await;

    if let Err(ref e) = result {
        error!("Error handling client {}: {}", addr, e);
    }

    if let Err(e) = SinkExt::close(&mut ws_stream).await {
        debug!("Close frame to {} not delivered: {}", addr, e);
    }

    debug!("Connection {} left in phase {}", state.id(), state.phase());
    state.transition(ConnectionPhase::Closed);
    info!(
        "Client disconnected: {} (connection {}, {} messages)",
        addr,
        state.id(),
        state.messages_processed()
    );

    result
}

/// Receive, decode and apply messages in arrival order until the stream ends.
async fn receive_loop(
    ws_stream: &mut WebSocketStream<TcpStream>,
    state: &mut ConnectionState,
    control_state: &ControlState,
    settings: ConnectionSettings,
) -> Result<(), ReceiverError> {
    while let Some(frame) = next_frame(ws_stream, settings.idle_timeout).await? {
        let message = frame.map_err(|e| ReceiverError::Transport {
            message: format!("Error reading message from {}: {}", state.peer(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let decoded = match &message {
            Message::Text(text) => {
                state.transition(ConnectionPhase::Processing);
                decode_command(text.as_str())
            }
            Message::Binary(data) => {
                state.transition(ConnectionPhase::Processing);
                decode_frame(data)
            }
            Message::Close(frame) => {
                debug!("Client {} sent close: {:?}", state.peer(), frame);
                break;
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };

        let command = decoded.inspect_err(|_| {
            error!(
                "Rejected message from {}: {}",
                state.peer(),
                raw_preview(&message)
            );
        })?;

        control_state.apply(command).await;
        state.transition(ConnectionPhase::AwaitingMessage);
    }

    Ok(())
}

/// Next frame from the peer, bounded by the idle timeout when one is set.
async fn next_frame(
    ws_stream: &mut WebSocketStream<TcpStream>,
    idle_timeout: Option<Duration>,
) -> Result<Option<Result<Message, WsError>>, ReceiverError> {
    let Some(limit) = idle_timeout else {
        return Ok(ws_stream.next().await);
    };

    timeout(limit, ws_stream.next())
        .await
        .map_err(|_| ReceiverError::IdleTimeout {
            message: format!("No message received within {}s", limit.as_secs()),
            location: ErrorLocation::from(Location::caller()),
        })
}

fn raw_preview(message: &Message) -> String {
    let raw = match message {
        Message::Text(text) => text.as_str().to_string(),
        Message::Binary(data) => String::from_utf8_lossy(data).into_owned(),
        other => format!("{:?}", other),
    };

    if raw.chars().count() <= RAW_PREVIEW_CHARS {
        return raw;
    }

    let mut preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
