//! Concurrent participant storage.
//!
//! [`ParticipantRegistry`] is the single source of truth for who is
//! connected and where. The whole map sits behind one
//! [`tokio::sync::RwLock`]: every operation takes the lock for exactly one
//! map access and never awaits anything else while holding it, so
//! `create`, `update`, `remove` and `snapshot` are each atomic and a
//! snapshot can never observe a half-written participant.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Participant, ParticipantId, ParticipantUpdate, Roster};
use crate::error::PresenceError;

/// Central store for all joined participants.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<HashMap<ParticipantId, Participant>>,
}

impl ParticipantRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a participant with default state and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::DuplicateIdentity`] if `id` is already
    /// present. The existing entry is left untouched; callers that want to
    /// recover use [`Self::reset`].
    pub async fn create(&self, id: ParticipantId) -> Result<Participant, PresenceError> {
        let mut map = self.participants.write().await;
        if map.contains_key(&id) {
            return Err(PresenceError::DuplicateIdentity(id));
        }
        let participant = Participant::new(id);
        map.insert(id, participant.clone());
        Ok(participant)
    }

    /// Installs default state for `id`, replacing any stale entry.
    pub async fn reset(&self, id: ParticipantId) -> Participant {
        let participant = Participant::new(id);
        self.participants
            .write()
            .await
            .insert(id, participant.clone());
        participant
    }

    /// Overwrites the mutable state of `id` and returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::UnknownParticipant`] if `id` is not present.
    pub async fn update(
        &self,
        id: ParticipantId,
        update: &ParticipantUpdate,
    ) -> Result<Participant, PresenceError> {
        let mut map = self.participants.write().await;
        let participant = map
            .get_mut(&id)
            .ok_or(PresenceError::UnknownParticipant(id))?;
        participant.apply(update);
        Ok(participant.clone())
    }

    /// Removes `id`, returning its last state. `None` means it was already
    /// gone, which is not an error.
    pub async fn remove(&self, id: ParticipantId) -> Option<Participant> {
        self.participants.write().await.remove(&id)
    }

    /// Returns a copy of one participant.
    pub async fn get(&self, id: ParticipantId) -> Option<Participant> {
        self.participants.read().await.get(&id).cloned()
    }

    /// Returns a point-in-time copy of the full registry.
    pub async fn snapshot(&self) -> Roster {
        self.participants.read().await.clone()
    }

    /// Returns the number of participants.
    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    /// Returns `true` if nobody is present.
    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}
