//! Live-update channel.
//!
//! Maintains a best-effort, auto-healing WebSocket connection to the
//! backend's per-task endpoint and delivers parsed [`ProgressMessage`]s to
//! a single consumer over an mpsc channel.
//!
//! The connection is owned by a supervised background task holding a
//! shutdown token (`tokio::sync::watch`). On close or connect failure the
//! task emits [`ChannelEvent::Disconnected`], waits a fixed delay, and
//! re-enters the connect routine, indefinitely, until the token is set.
//! Because there is only ever one supervising task, at most one reconnect
//! is pending at any time, and teardown cancels it by construction.
//!
//! Failure semantics: nothing here returns an error to the caller. Connect
//! failures, dropped sockets, and malformed frames are logged and folded
//! into the disconnect/retry cycle.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use pw_protocol::ProgressMessage;

/// Timing knobs for the channel. Defaults match the production contract;
/// tests shrink them.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Delay between a disconnect and the next connect attempt.
    pub reconnect_delay: Duration,
    /// Interval between liveness pings while connected.
    pub ping_interval: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(3),
            ping_interval: Duration::from_secs(30),
        }
    }
}

/// Events delivered to the channel's consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The WebSocket handshake completed.
    Connected,
    /// The connection dropped (a reconnect is already scheduled).
    Disconnected,
    /// A parsed live-update frame.
    Message(ProgressMessage),
}

/// Handle to a running live-update channel.
///
/// Dropping the handle also stops the supervising task at its next await
/// point (the watch sender closes); [`TaskChannel::disconnect`] does the
/// same but waits for the task to finish, guaranteeing no socket or timer
/// outlives the call.
pub struct TaskChannel {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TaskChannel {
    /// Open a channel to the given live-update URL.
    ///
    /// Events are delivered on `events_tx`; if the receiver is dropped the
    /// supervising task stops on its own.
    pub fn connect(url: Url, config: ChannelConfig, events_tx: mpsc::Sender<ChannelEvent>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(channel_loop(url, config, events_tx, shutdown_rx));
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Tear the channel down: cancel any pending reconnect, close the
    /// socket if open, and wait for the supervising task to exit.
    pub async fn disconnect(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

/// Resolves once the shutdown flag is set or the handle is dropped.
pub(crate) async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender dropped: treat as shutdown.
            return;
        }
    }
}

async fn channel_loop(
    url: Url,
    config: ChannelConfig,
    events_tx: mpsc::Sender<ChannelEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            return;
        }

        let connect = tokio::select! {
            connect = connect_async(url.clone()) => connect,
            _ = wait_for_shutdown(&mut shutdown_rx) => return,
        };

        match connect {
            Ok((socket, _)) => {
                debug!("live-update channel connected: {url}");
                if events_tx.send(ChannelEvent::Connected).await.is_err() {
                    return;
                }
                run_connection(socket, &config, &events_tx, &mut shutdown_rx).await;
                if *shutdown_rx.borrow() {
                    return;
                }
                if events_tx.send(ChannelEvent::Disconnected).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                warn!("live-update connect to {url} failed: {err}");
                if events_tx.send(ChannelEvent::Disconnected).await.is_err() {
                    return;
                }
            }
        }

        // Exactly one reconnect pending; teardown cancels the sleep.
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = wait_for_shutdown(&mut shutdown_rx) => return,
        }
    }
}

/// Pump one open connection until it drops or shutdown is requested.
async fn run_connection(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: &ChannelConfig,
    events_tx: &mpsc::Sender<ChannelEvent>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let (mut sink, mut stream) = socket.split();

    // First ping only after a full interval, not immediately on connect.
    let start = tokio::time::Instant::now() + config.ping_interval;
    let mut ping = tokio::time::interval_at(start, config.ping_interval);

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(message) = decode_frame(&text) {
                        if events_tx.send(ChannelEvent::Message(message)).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => return,
                Some(Ok(_)) => {
                    // Binary and transport ping/pong frames carry nothing
                    // for the aggregator.
                }
                Some(Err(err)) => {
                    warn!("live-update stream error: {err}");
                    return;
                }
            },
            _ = ping.tick() => {
                // Liveness marker, not a structured event.
                if sink.send(Message::Text("ping".to_string())).await.is_err() {
                    return;
                }
            }
            _ = wait_for_shutdown(shutdown_rx) => {
                let _ = sink.close().await;
                return;
            }
        }
    }
}

/// Parse one inbound text frame.
///
/// Returns `None` for the server's `pong` liveness reply and for malformed
/// payloads, which are logged and never delivered. A bad frame must not
/// take the channel down.
fn decode_frame(text: &str) -> Option<ProgressMessage> {
    if text == "pong" {
        return None;
    }

    match serde_json::from_str::<ProgressMessage>(text) {
        Ok(message) => Some(message),
        Err(err) => {
            warn!("Ignoring malformed live-update frame: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_frame() {
        let text = r#"{
            "type": "progress",
            "data": {"stage": "render", "stage_progress": 40.0},
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;

        let message = decode_frame(text).expect("valid frame should decode");
        assert_eq!(message.event_type, "progress");
    }

    #[test]
    fn test_decode_malformed_frame_returns_none() {
        assert!(decode_frame("not json at all").is_none());
        assert!(decode_frame("{\"type\": \"progress\"}").is_none()); // missing fields
        assert!(decode_frame("").is_none());
    }

    #[test]
    fn test_decode_pong_is_swallowed() {
        assert!(decode_frame("pong").is_none());
    }
}
