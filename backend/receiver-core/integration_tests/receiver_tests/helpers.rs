//! Test helpers for receiver integration tests.
//!
//! - Starting a receiver on an ephemeral localhost port
//! - Connecting and sending control messages
//! - Waiting for state changes and connection closes
//! - Capturing log output

use receiver_core::config::ReceiverConfig;
use receiver_core::control::ControlState;
use receiver_core::receiver::{ReceiverHandle, start_receiver};

use models::Controls;

use std::net::SocketAddr;
use std::sync::{Mutex, Once};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{Level, LevelFilter, Log, Metadata, Record};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long helpers wait for the server to react before giving up.
pub const SERVER_REACTION: Duration = Duration::from_secs(2);

/// Test helper: Start a receiver on `127.0.0.1:0` with a fresh control state.
pub async fn start_test_receiver(idle_timeout_secs: Option<u64>) -> (ReceiverHandle, ControlState) {
    let mut config = ReceiverConfig::default();
    config.listen.host = String::from("127.0.0.1");
    config.listen.port = 0;
    config.connection.idle_timeout_secs = idle_timeout_secs;

    let control_state = ControlState::new();
    let handle = start_receiver(&config, control_state.clone())
        .await
        .expect("Failed to start receiver");

    (handle, control_state)
}

/// Test helper: Connect a WebSocket client to the receiver.
pub async fn connect(addr: SocketAddr) -> TestSocket {
    let url = format!("ws://{}", addr);
    let (ws_stream, _) = connect_async(&url)
        .await
        .expect("Failed to connect to receiver");
    ws_stream
}

/// Test helper: Send one text frame.
pub async fn send_text(ws: &mut TestSocket, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("Failed to send message");
}

/// Test helper: Poll the control state until it equals `expected`.
pub async fn wait_for_controls(state: &ControlState, expected: Controls) -> bool {
    let poll = async {
        loop {
            if state.snapshot().await == expected {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
    };
    timeout(SERVER_REACTION, poll).await.is_ok()
}

/// Test helper: Wait until the server closes the connection.
///
/// Returns false if the connection is still open after [`SERVER_REACTION`].
pub async fn wait_for_close(ws: &mut TestSocket) -> bool {
    let closed = async {
        loop {
            match ws.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
            }
        }
    };
    timeout(SERVER_REACTION, closed).await.is_ok()
}

// ============================================================================
// Log capture
// ============================================================================

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());
static INIT_CAPTURE_ONCE: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

/// Test helper: Route `log` output into an in-memory buffer (once per test binary).
pub fn capture_logs() {
    INIT_CAPTURE_ONCE.call_once(|| {
        log::set_logger(&LOGGER).expect("Another logger is already installed");
        log::set_max_level(LevelFilter::Info);
    });
}

/// Test helper: Whether any captured log line contains `needle`.
pub fn logs_contain(needle: &str) -> bool {
    CAPTURED
        .lock()
        .map(|captured| captured.iter().any(|line| line.contains(needle)))
        .unwrap_or(false)
}
