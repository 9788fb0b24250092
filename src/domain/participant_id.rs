//! Type-safe participant identifier.
//!
//! [`ParticipantId`] is a newtype wrapper around [`uuid::Uuid`] (v4) minted
//! once per accepted connection, so a participant identity can never be
//! confused with any other UUID flowing through the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a connected participant.
///
/// Generated by the [`crate::ws::ConnectionManager`] at accept time and
/// threaded explicitly through every handler for that connection. Used as
/// the key of [`super::ParticipantRegistry`] and as the scalar payload of
/// `participant-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ParticipantId(uuid::Uuid);

impl ParticipantId {
    /// Creates a new random `ParticipantId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ParticipantId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ParticipantId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(ParticipantId::new(), ParticipantId::new());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ParticipantId::new();
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn usable_as_json_map_key() {
        use std::collections::HashMap;
        let id = ParticipantId::new();
        let mut map = HashMap::new();
        map.insert(id, 1_u8);

        let Ok(json) = serde_json::to_string(&map) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<HashMap<ParticipantId, u8>>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back.get(&id), Some(&1));
    }

    #[test]
    fn from_uuid_keeps_value() {
        let uuid = uuid::Uuid::new_v4();
        assert_eq!(*ParticipantId::from_uuid(uuid).as_uuid(), uuid);
    }
}
