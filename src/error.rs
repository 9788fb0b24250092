//! Gateway error types with HTTP status code mapping.
//!
//! [`PresenceError`] is the central error type. Registry and delivery
//! failures are contained and logged where they happen; they never reach a
//! WebSocket peer. The only place an error becomes visible is the auxiliary
//! HTTP surface, where each variant maps to a status code and a structured
//! JSON body.

use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ParticipantId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "unknown participant: 5f0c…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Config / request | 500 / 400 Bad Request     |
/// | 2000–2999 | Registry         | 404 Not Found / 409       |
/// | 3000–3999 | Transport        | 502 / 503 / 500           |
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// A participant with this id is already registered. Internal invariant
    /// violation: identities are minted fresh per connection.
    #[error("duplicate participant identity: {0}")]
    DuplicateIdentity(ParticipantId),

    /// No participant with this id is registered, e.g. an update that raced
    /// with its own disconnect.
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// A connection's outbound queue is full. The connection is evicted
    /// rather than left running with a gap in its event stream.
    #[error("outbound queue of {0} is full")]
    QueueFull(ParticipantId),

    /// An event could not be queued for a connection.
    #[error("delivery to {id} failed: {reason}")]
    DeliveryFailure {
        /// Intended recipient.
        id: ParticipantId,
        /// Why the outbound queue rejected the event.
        reason: String,
    },

    /// Transport failure or liveness timeout. Always ends the connection.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Malformed HTTP request, e.g. a path id that is not a UUID.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid startup configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An event could not be encoded for the wire.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PresenceError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Config(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::UnknownParticipant(_) => 2001,
            Self::DuplicateIdentity(_) => 2002,
            Self::DeliveryFailure { .. } => 3001,
            Self::ConnectionError(_) => 3002,
            Self::Serialization(_) => 3003,
            Self::QueueFull(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnknownParticipant(_) => StatusCode::NOT_FOUND,
            Self::DuplicateIdentity(_) => StatusCode::CONFLICT,
            Self::DeliveryFailure { .. } | Self::ConnectionError(_) => StatusCode::BAD_GATEWAY,
            Self::QueueFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PresenceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<PathRejection> for PresenceError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}
