//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::dto::RosterResponse;
use super::handlers::{participants, system};
use crate::domain::{Participant, ParticipantId, Position, Rotation};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every HTTP endpoint.
///
/// The WebSocket protocol at `/ws` is not described here.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "presence-gateway",
        description = "Real-time multiplayer presence server"
    ),
    paths(
        system::liveness_handler,
        system::health_handler,
        participants::list_participants,
        participants::get_participant,
    ),
    components(schemas(
        Participant,
        ParticipantId,
        Position,
        Rotation,
        RosterResponse,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness and health"),
        (name = "Participants", description = "Read-only view of the presence registry"),
    )
)]
pub struct ApiDoc;
