//! Outbound presence events pushed from the gateway to clients.
//!
//! Every membership or state change produces a [`PresenceEvent`], which the
//! [`crate::broadcast::BroadcastRouter`] hands to the
//! [`crate::ws::ConnectionManager`] for delivery. On the wire each event is
//! an adjacently tagged JSON object:
//!
//! ```json
//! { "event": "participant-left", "data": "5f0c…" }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Participant, ParticipantId};

/// Point-in-time copy of the whole registry, keyed by participant id.
pub type Roster = HashMap<ParticipantId, Participant>;

/// Server → client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum PresenceEvent {
    /// Sent once to a new connection: everyone currently present, itself
    /// included.
    CurrentRoster(Roster),
    /// Sent to everyone else when a connection joins.
    ParticipantJoined(Participant),
    /// Sent to everyone else when a connection closes.
    ParticipantLeft(ParticipantId),
    /// Sent to everyone except the sender after a state update.
    ParticipantMoved(Participant),
}

impl PresenceEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::CurrentRoster(_) => "current-roster",
            Self::ParticipantJoined(_) => "participant-joined",
            Self::ParticipantLeft(_) => "participant-left",
            Self::ParticipantMoved(_) => "participant-moved",
        }
    }

    /// Returns the participant this event is about, if it is about one.
    #[cfg(test)]
    pub(crate) fn subject(&self) -> Option<ParticipantId> {
        match self {
            Self::CurrentRoster(_) => None,
            Self::ParticipantJoined(p) | Self::ParticipantMoved(p) => Some(p.id),
            Self::ParticipantLeft(id) => Some(*id),
        }
    }

    /// Serializes the event into its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
