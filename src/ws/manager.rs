//! Registry of open WebSocket connections.
//!
//! [`ConnectionManager`] mints each connection's [`ParticipantId`] and holds
//! the sending half of its bounded outbound queue. Delivery never awaits:
//! events are serialized once and pushed with `try_send`, so a slow or dead
//! peer costs the others nothing. Nothing is ever retried.
//!
//! A peer whose queue is full is evicted: its sender is dropped, its task
//! drains what is already queued and leaves through the normal disconnect
//! path, and the client rejoins with a fresh roster. An open connection
//! therefore never has a gap in its event stream.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};

use crate::domain::{ParticipantId, PresenceEvent};
use crate::error::PresenceError;

/// Serialized event as queued for a connection's writer.
pub type OutboundFrame = Arc<str>;

/// Sending half of a connection's outbound queue.
pub type OutboundSender = mpsc::Sender<OutboundFrame>;

#[derive(Debug)]
struct ConnectionHandle {
    sender: OutboundSender,
    connected_at: DateTime<Utc>,
}

/// Live connection set, keyed by participant id.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<ParticipantId, ConnectionHandle>>,
}

impl ConnectionManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly accepted connection and returns its identity.
    ///
    /// The id is never one held by a currently open connection.
    pub async fn on_connect(&self, sender: OutboundSender) -> ParticipantId {
        let mut connections = self.connections.write().await;
        let mut id = ParticipantId::new();
        while connections.contains_key(&id) {
            tracing::warn!(participant_id = %id, "identity collision, minting another");
            id = ParticipantId::new();
        }
        connections.insert(
            id,
            ConnectionHandle {
                sender,
                connected_at: Utc::now(),
            },
        );
        tracing::debug!(participant_id = %id, open = connections.len(), "connection registered");
        id
    }

    /// Forgets a connection. Returns `false` if it was already gone.
    ///
    /// Dropping the stored sender closes the connection's outbound queue,
    /// which makes its writer shut the socket down.
    pub async fn on_disconnect(&self, id: ParticipantId) -> bool {
        let removed = self.connections.write().await.remove(&id);
        match removed {
            Some(handle) => {
                let lifetime = Utc::now().signed_duration_since(handle.connected_at);
                tracing::debug!(
                    participant_id = %id,
                    lifetime_ms = lifetime.num_milliseconds(),
                    "connection unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Queues `event` for a single connection.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::DeliveryFailure`] if the connection is not
    /// registered or has closed, [`PresenceError::QueueFull`] if its queue
    /// is full (the connection is then evicted), and
    /// [`PresenceError::Serialization`] if the event cannot be encoded.
    pub async fn send(&self, id: ParticipantId, event: &PresenceEvent) -> Result<(), PresenceError> {
        let frame: OutboundFrame = Arc::from(event.to_json()?);
        let result = {
            let connections = self.connections.read().await;
            let handle = connections
                .get(&id)
                .ok_or_else(|| PresenceError::DeliveryFailure {
                    id,
                    reason: "not connected".to_string(),
                })?;
            deliver(id, handle, &frame)
        };
        if let Err(PresenceError::QueueFull(_)) = result {
            self.evict(&[id]).await;
        }
        result
    }

    /// Queues `event` for every open connection except `exclude`.
    ///
    /// Returns how many connections accepted the event. Per-recipient
    /// failures are logged and skipped; recipients with a full queue are
    /// evicted.
    pub async fn broadcast(&self, event: &PresenceEvent, exclude: Option<ParticipantId>) -> usize {
        let frame: OutboundFrame = match event.to_json() {
            Ok(json) => Arc::from(json),
            Err(e) => {
                tracing::warn!(event = event.event_name(), error = %e, "failed to serialize event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut stalled = Vec::new();
        {
            let connections = self.connections.read().await;
            for (id, handle) in connections.iter() {
                if Some(*id) == exclude {
                    continue;
                }
                match deliver(*id, handle, &frame) {
                    Ok(()) => delivered += 1,
                    Err(PresenceError::QueueFull(_)) => stalled.push(*id),
                    Err(e) => {
                        tracing::warn!(event = event.event_name(), error = %e, "dropping event for peer");
                    }
                }
            }
        }
        if !stalled.is_empty() {
            self.evict(&stalled).await;
        }

        tracing::trace!(
            event = event.event_name(),
            recipients = delivered,
            "broadcast event"
        );
        delivered
    }

    /// Drops the senders of connections that cannot keep up, which closes
    /// their queues and ends their tasks.
    async fn evict(&self, ids: &[ParticipantId]) {
        let mut connections = self.connections.write().await;
        for id in ids {
            if connections.remove(id).is_some() {
                tracing::warn!(participant_id = %id, "outbound queue full, evicting connection");
            }
        }
    }

    /// Returns the number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if `id` is an open connection.
    pub async fn contains(&self, id: ParticipantId) -> bool {
        self.connections.read().await.contains_key(&id)
    }
}

fn deliver(
    id: ParticipantId,
    handle: &ConnectionHandle,
    frame: &OutboundFrame,
) -> Result<(), PresenceError> {
    handle
        .sender
        .try_send(Arc::clone(frame))
        .map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PresenceError::QueueFull(id),
            mpsc::error::TrySendError::Closed(_) => PresenceError::DeliveryFailure {
                id,
                reason: "connection closed".to_string(),
            },
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Participant;

    fn left(id: ParticipantId) -> PresenceEvent {
        PresenceEvent::ParticipantLeft(id)
    }

    #[tokio::test]
    async fn on_connect_assigns_distinct_ids() {
        let manager = ConnectionManager::new();
        let (tx1, _rx1) = mpsc::channel(4);
        let (tx2, _rx2) = mpsc::channel(4);

        let a = manager.on_connect(tx1).await;
        let b = manager.on_connect(tx2).await;
        assert_ne!(a, b);
        assert_eq!(manager.connection_count().await, 2);
        assert!(manager.contains(a).await);
    }

    #[tokio::test]
    async fn on_disconnect_is_idempotent_and_closes_queue() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::channel(4);
        let id = manager.on_connect(tx).await;

        assert!(manager.on_disconnect(id).await);
        assert!(!manager.on_disconnect(id).await);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn send_reaches_only_target() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        let a = manager.on_connect(tx1).await;
        let _b = manager.on_connect(tx2).await;

        let event = PresenceEvent::ParticipantJoined(Participant::new(a));
        assert!(manager.send(a, &event).await.is_ok());

        let Some(frame) = rx1.recv().await else {
            panic!("target received nothing");
        };
        assert!(frame.contains("participant-joined"));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_to_unknown_is_delivery_failure() {
        let manager = ConnectionManager::new();
        let ghost = ParticipantId::new();
        let result = manager.send(ghost, &left(ghost)).await;
        assert!(matches!(result, Err(PresenceError::DeliveryFailure { id, .. }) if id == ghost));
    }

    #[tokio::test]
    async fn broadcast_skips_excluded_connection() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        let (tx3, mut rx3) = mpsc::channel(4);
        let a = manager.on_connect(tx1).await;
        let _b = manager.on_connect(tx2).await;
        let _c = manager.on_connect(tx3).await;

        let delivered = manager.broadcast(&left(ParticipantId::new()), Some(a)).await;
        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_ok());
        assert!(rx3.try_recv().is_ok());
    }

    #[tokio::test]
    async fn broadcast_isolates_failed_recipients() {
        let manager = ConnectionManager::new();
        let (closed_tx, closed_rx) = mpsc::channel(4);
        let (full_tx, _full_rx) = mpsc::channel(1);
        let (ok_tx, mut ok_rx) = mpsc::channel(4);
        let _closed = manager.on_connect(closed_tx).await;
        let full = manager.on_connect(full_tx).await;
        let _ok = manager.on_connect(ok_tx).await;
        drop(closed_rx);
        assert!(manager.send(full, &left(full)).await.is_ok());

        let delivered = manager.broadcast(&left(ParticipantId::new()), None).await;
        assert_eq!(delivered, 1);
        assert!(ok_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn full_queue_evicts_connection() {
        let manager = ConnectionManager::new();
        let (full_tx, mut full_rx) = mpsc::channel(1);
        let (ok_tx, _ok_rx) = mpsc::channel(4);
        let full = manager.on_connect(full_tx).await;
        let ok = manager.on_connect(ok_tx).await;
        assert!(manager.send(full, &left(ok)).await.is_ok());

        let _ = manager.broadcast(&left(ParticipantId::new()), None).await;
        assert!(!manager.contains(full).await);
        assert!(manager.contains(ok).await);

        // Already-queued frames still drain, then the queue reports closed.
        assert!(full_rx.recv().await.is_some());
        assert!(full_rx.recv().await.is_none());
        assert!(!manager.on_disconnect(full).await);
    }

    #[tokio::test]
    async fn send_to_full_queue_evicts_connection() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = mpsc::channel(1);
        let id = manager.on_connect(tx).await;
        assert!(manager.send(id, &left(id)).await.is_ok());

        let result = manager.send(id, &left(id)).await;
        assert!(matches!(result, Err(PresenceError::QueueFull(full)) if full == id));
        assert!(!manager.contains(id).await);
    }

    #[tokio::test]
    async fn broadcast_shares_one_serialized_frame() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        let _ = manager.on_connect(tx1).await;
        let _ = manager.on_connect(tx2).await;

        let _ = manager.broadcast(&left(ParticipantId::new()), None).await;
        let (Ok(f1), Ok(f2)) = (rx1.try_recv(), rx2.try_recv()) else {
            panic!("both peers should receive the frame");
        };
        assert!(Arc::ptr_eq(&f1, &f2));
    }
}
