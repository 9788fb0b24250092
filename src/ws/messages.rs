//! Inbound WebSocket message types.
//!
//! Clients speak the same adjacently tagged envelope the gateway pushes
//! (`{"event": …, "data": …}`, see [`crate::domain::PresenceEvent`]), but
//! only one event flows client → server.

use serde::{Deserialize, Serialize};

use crate::domain::ParticipantUpdate;

/// Client → server event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// New position, yaw and animation for the sender's own participant.
    ParticipantUpdate(ParticipantUpdate),
}

impl ClientEvent {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] for malformed JSON, unknown event
    /// names, or payloads of the wrong shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
