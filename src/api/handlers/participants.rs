//! Read-only roster handlers.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RosterResponse;
use crate::app_state::AppState;
use crate::domain::{Participant, ParticipantId};
use crate::error::{ErrorResponse, PresenceError};

/// `GET /participants`: everyone currently present.
#[utoipa::path(
    get,
    path = "/api/v1/participants",
    tag = "Participants",
    summary = "List participants",
    description = "Returns a point-in-time snapshot of the registry, the same data a new WebSocket client receives as `current-roster`.",
    responses(
        (status = 200, description = "Current roster", body = RosterResponse),
    )
)]
pub async fn list_participants(State(state): State<AppState>) -> impl IntoResponse {
    Json(RosterResponse::from(state.roster().await))
}

/// `GET /participants/{id}`: one participant's current state.
///
/// # Errors
///
/// Returns [`PresenceError::InvalidRequest`] if `id` is not a UUID and
/// [`PresenceError::UnknownParticipant`] if nobody with that id is
/// connected.
#[utoipa::path(
    get,
    path = "/api/v1/participants/{id}",
    tag = "Participants",
    summary = "Get participant",
    description = "Returns the latest state of a single connected participant.",
    params(
        ("id" = uuid::Uuid, Path, description = "Participant UUID"),
    ),
    responses(
        (status = 200, description = "Participant state", body = Participant),
        (status = 400, description = "Id is not a UUID", body = ErrorResponse),
        (status = 404, description = "Participant not connected", body = ErrorResponse),
    )
)]
pub async fn get_participant(
    State(state): State<AppState>,
    path: Result<Path<uuid::Uuid>, PathRejection>,
) -> Result<Json<Participant>, PresenceError> {
    let Path(id) = path?;
    let id = ParticipantId::from_uuid(id);
    state
        .router
        .registry()
        .get(id)
        .await
        .map(Json)
        .ok_or(PresenceError::UnknownParticipant(id))
}

/// Roster routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/participants", get(list_participants))
        .route("/participants/{id}", get(get_participant))
}
