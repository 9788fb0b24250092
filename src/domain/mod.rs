//! Domain layer: participant identity and state, presence events, and the
//! participant registry.
//!
//! Nothing here knows about sockets. The registry is an explicitly owned
//! component shared through [`crate::app_state::AppState`], never a global.

pub mod participant;
pub mod participant_id;
pub mod participant_registry;
pub mod presence_event;

pub use participant::{Participant, ParticipantUpdate, Position, Rotation};
pub use participant_id::ParticipantId;
pub use participant_registry::ParticipantRegistry;
pub use presence_event::{PresenceEvent, Roster};
