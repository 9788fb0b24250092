//! Participant state snapshot and the client-supplied update payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParticipantId;

/// Animation label assigned to a freshly joined participant.
pub const DEFAULT_ANIMATION: &str = "Idle";

/// Model label assigned to a freshly joined participant.
pub const DEFAULT_MODEL: &str = "default";

/// World-space coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

/// Orientation around the vertical axis. The range is whatever the client
/// sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rotation {
    /// Yaw.
    pub y: f64,
}

/// Transient state of one connected participant.
///
/// Each open connection that completed the join handshake owns exactly one
/// `Participant` in the registry. Only `position`, `rotation` and
/// `animation` change after creation, and only through updates from the
/// owning connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    /// Connection identity (immutable).
    pub id: ParticipantId,
    /// Current position.
    pub position: Position,
    /// Current yaw.
    pub rotation: Rotation,
    /// Current animation/pose label.
    pub animation: String,
    /// Visual representation label (immutable).
    pub model: String,
}

impl Participant {
    /// Creates a participant with default state: origin, zero yaw, idle.
    #[must_use]
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            position: Position::default(),
            rotation: Rotation::default(),
            animation: DEFAULT_ANIMATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overwrites the mutable fields with `update`. Last write wins.
    pub fn apply(&mut self, update: &ParticipantUpdate) {
        self.position = update.position;
        self.rotation = update.rotation;
        self.animation.clone_from(&update.animation);
    }
}

/// State update sent by a client for its own participant.
///
/// Carries no id: the gateway infers it from the connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantUpdate {
    /// New position.
    pub position: Position,
    /// New yaw.
    pub rotation: Rotation,
    /// New animation label.
    pub animation: String,
}
