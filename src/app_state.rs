//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::broadcast::BroadcastRouter;
use crate::domain::{ParticipantRegistry, Roster};
use crate::ws::{ConnectionManager, ConnectionSettings};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Presence protocol entry point; owns the registry and connection set.
    pub router: Arc<BroadcastRouter>,
    /// Liveness and buffering knobs applied to every new connection.
    pub connection_settings: ConnectionSettings,
}

impl AppState {
    /// Builds the state with a fresh, empty registry and connection set.
    #[must_use]
    pub fn new(connection_settings: ConnectionSettings) -> Self {
        let registry = Arc::new(ParticipantRegistry::new());
        let connections = Arc::new(ConnectionManager::new());
        Self {
            router: Arc::new(BroadcastRouter::new(registry, connections)),
            connection_settings,
        }
    }

    /// Returns a point-in-time copy of everyone present.
    pub async fn roster(&self) -> Roster {
        self.router.registry().snapshot().await
    }
}
