//! Per-connection task.
//!
//! One task per socket. It joins through the [`BroadcastRouter`], then runs
//! a single select loop over three sources: inbound frames, its own
//! outbound queue, and the ping timer. Whatever ends the loop (client close,
//! transport error, liveness timeout, or the manager dropping the queue)
//! the task leaves through the router exactly once.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::liveness::Liveness;
use super::messages::ClientEvent;
use crate::broadcast::BroadcastRouter;
use crate::config::GatewayConfig;
use crate::domain::ParticipantId;
use crate::error::PresenceError;

/// Liveness and buffering knobs for each connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// How often the server pings.
    pub ping_interval: Duration,
    /// Maximum silence before the connection is dropped.
    pub ping_timeout: Duration,
    /// Capacity of the outbound queue.
    pub outbound_buffer: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(25),
            ping_timeout: Duration::from_secs(60),
            outbound_buffer: 256,
        }
    }
}

impl From<&GatewayConfig> for ConnectionSettings {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            // `tokio::time::interval` rejects a zero period.
            ping_interval: Duration::from_secs(config.ping_interval_secs.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_secs),
            outbound_buffer: config.outbound_buffer,
        }
    }
}

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(
    socket: WebSocket,
    router: Arc<BroadcastRouter>,
    settings: ConnectionSettings,
) {
    let (outbound_tx, mut outbound_rx) = mpsc::channel(settings.outbound_buffer.max(1));
    let id = router.join(outbound_tx).await;

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut liveness = Liveness::new(settings.ping_timeout);
    let mut ping = tokio::time::interval(settings.ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ping.tick().await;

    let outcome: Result<(), PresenceError> = loop {
        tokio::select! {
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | None => break Ok(()),
                    Some(Ok(message)) => {
                        liveness.record();
                        if let Message::Text(text) = message {
                            handle_text_message(&router, id, text.as_str()).await;
                        }
                    }
                    Some(Err(e)) => break Err(PresenceError::ConnectionError(e.to_string())),
                }
            }
            outbound = outbound_rx.recv() => {
                let Some(frame) = outbound else {
                    break Err(PresenceError::ConnectionError(
                        "closed by connection manager".to_string(),
                    ));
                };
                if let Err(e) = ws_tx.send(Message::text(&*frame)).await {
                    break Err(PresenceError::ConnectionError(e.to_string()));
                }
            }
            _ = ping.tick() => {
                if liveness.is_expired() {
                    break Err(PresenceError::ConnectionError(format!(
                        "no liveness response for {} ms",
                        liveness.silence().as_millis()
                    )));
                }
                if let Err(e) = ws_tx.send(Message::Ping(Bytes::new())).await {
                    break Err(PresenceError::ConnectionError(e.to_string()));
                }
            }
        }
    };

    match outcome {
        Ok(()) => tracing::info!(participant_id = %id, "client closed connection"),
        Err(e) => tracing::warn!(participant_id = %id, error = %e, "dropping connection"),
    }

    router.leave(id).await;
    let _ = ws_tx.close().await;
}

/// Dispatches a text frame. Malformed frames are ignored: the protocol has
/// no error replies.
async fn handle_text_message(router: &BroadcastRouter, id: ParticipantId, text: &str) {
    match ClientEvent::from_json(text) {
        Ok(ClientEvent::ParticipantUpdate(update)) => {
            let _ = router.update(id, update).await;
        }
        Err(e) => {
            tracing::debug!(participant_id = %id, error = %e, "ignoring malformed frame");
        }
    }
}
