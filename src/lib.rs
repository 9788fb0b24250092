//! # presence-gateway
//!
//! Real-time multiplayer presence server. Clients hold a WebSocket open;
//! the gateway keeps an in-memory registry of every connected
//! participant's transient state (position, yaw, animation) and fans each
//! change out to everyone else.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket /ws, HTTP)
//!     │
//!     ├── WS connection tasks (ws/)      one per socket, liveness pings
//!     ├── HTTP handlers (api/)           /test, /health, /api/v1, static bundle
//!     │
//!     ├── BroadcastRouter (broadcast/)   join / leave / update protocol
//!     │
//!     ├── ConnectionManager (ws/)        identities + outbound queues
//!     └── ParticipantRegistry (domain/)  id → Participant
//! ```
//!
//! ## Protocol
//!
//! | Event                | Direction        | Payload                      |
//! |----------------------|------------------|------------------------------|
//! | `current-roster`     | server → joiner  | map of id → participant      |
//! | `participant-joined` | server → others  | participant                  |
//! | `participant-left`   | server → others  | id                           |
//! | `participant-update` | client → server  | position, rotation, animation|
//! | `participant-moved`  | server → others  | participant                  |

pub mod api;
pub mod app_state;
pub mod broadcast;
pub mod config;
pub mod domain;
pub mod error;
pub mod ws;
