//! Presence protocol: join, leave, update.
//!
//! | Inbound            | Registry     | Outbound                                        |
//! |--------------------|--------------|-------------------------------------------------|
//! | connection opened  | `create`     | `current-roster` to joiner, `participant-joined` to others |
//! | connection closed  | `remove`     | `participant-left` to others                    |
//! | state update       | `update`     | `participant-moved` to others, or nothing       |
//!
//! Joins and leaves hold the membership gate exclusively, updates hold it
//! shared. A joiner's roster is therefore the first frame in its queue and
//! every `participant-moved` or `participant-left` it receives afterwards
//! is about state at least as new as that roster. Updates from different
//! connections still proceed in parallel.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Participant, ParticipantId, ParticipantRegistry, ParticipantUpdate, PresenceEvent};
use crate::ws::ConnectionManager;
use crate::ws::manager::OutboundSender;

/// Routes inbound connection events to registry mutations and fan-out.
///
/// Every mutation method follows the pattern: take the gate → mutate the
/// registry → fan out through the [`ConnectionManager`]. Nothing is ever
/// reported back to the originating peer.
#[derive(Debug)]
pub struct BroadcastRouter {
    registry: Arc<ParticipantRegistry>,
    connections: Arc<ConnectionManager>,
    membership: RwLock<()>,
}

impl BroadcastRouter {
    /// Creates a router over the given registry and connection set.
    #[must_use]
    pub fn new(registry: Arc<ParticipantRegistry>, connections: Arc<ConnectionManager>) -> Self {
        Self {
            registry,
            connections,
            membership: RwLock::new(()),
        }
    }

    /// Returns the participant registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ParticipantRegistry> {
        &self.registry
    }

    /// Returns the connection manager.
    #[must_use]
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// Admits a new connection whose outbound queue is `sender`.
    ///
    /// Mints its identity, creates its participant, queues the full roster
    /// for it, and announces it to everyone else.
    pub async fn join(&self, sender: OutboundSender) -> ParticipantId {
        let _gate = self.membership.write().await;

        let id = self.connections.on_connect(sender).await;
        let participant = match self.registry.create(id).await {
            Ok(participant) => participant,
            Err(e) => {
                tracing::warn!(participant_id = %id, error = %e, "replacing stale registry entry");
                self.registry.reset(id).await
            }
        };

        let roster = self.registry.snapshot().await;
        let roster_size = roster.len();
        if let Err(e) = self
            .connections
            .send(id, &PresenceEvent::CurrentRoster(roster))
            .await
        {
            tracing::warn!(participant_id = %id, error = %e, "failed to queue roster");
        }

        let peers = self
            .connections
            .broadcast(&PresenceEvent::ParticipantJoined(participant), Some(id))
            .await;

        tracing::info!(participant_id = %id, roster_size, peers, "participant joined");
        id
    }

    /// Handles a closed connection. Safe to call more than once; only the
    /// call that actually removes the participant announces the departure.
    pub async fn leave(&self, id: ParticipantId) -> Option<Participant> {
        let _gate = self.membership.write().await;

        let was_open = self.connections.on_disconnect(id).await;
        let removed = self.registry.remove(id).await;

        match &removed {
            Some(_) => {
                let peers = self
                    .connections
                    .broadcast(&PresenceEvent::ParticipantLeft(id), Some(id))
                    .await;
                tracing::info!(participant_id = %id, peers, "participant left");
            }
            None if was_open => {
                tracing::warn!(participant_id = %id, "open connection had no participant");
            }
            None => {
                tracing::debug!(participant_id = %id, "already disconnected");
            }
        }
        removed
    }

    /// Applies a state update from `id` and relays it to every other
    /// connection.
    ///
    /// Returns the new state, or `None` if `id` has already left, in which
    /// case nothing is broadcast.
    pub async fn update(&self, id: ParticipantId, update: ParticipantUpdate) -> Option<Participant> {
        let _gate = self.membership.read().await;

        match self.registry.update(id, &update).await {
            Ok(participant) => {
                let peers = self
                    .connections
                    .broadcast(&PresenceEvent::ParticipantMoved(participant.clone()), Some(id))
                    .await;
                tracing::trace!(participant_id = %id, peers, "participant moved");
                Some(participant)
            }
            Err(e) => {
                tracing::debug!(participant_id = %id, error = %e, "dropping update");
                None
            }
        }
    }
}
