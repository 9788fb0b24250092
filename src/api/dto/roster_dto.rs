//! Roster response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Participant, Roster};

/// Everyone currently present, ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResponse {
    /// Number of participants.
    pub count: usize,
    /// Participant snapshots.
    pub participants: Vec<Participant>,
}

impl From<Roster> for RosterResponse {
    fn from(roster: Roster) -> Self {
        let mut participants: Vec<Participant> = roster.into_values().collect();
        participants.sort_by(|a, b| a.id.as_uuid().cmp(b.id.as_uuid()));
        Self {
            count: participants.len(),
            participants,
        }
    }
}
