//! HTTP surface around the WebSocket endpoint: liveness, health, a
//! read-only roster under `/api/v1`, OpenAPI docs, and the static client
//! bundle.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

/// Assembles the full application: API routes, the `/ws` endpoint, and the
/// static bundle served from `static_dir` (`/` maps to `index.html`, any
/// other unmatched path to a file under the directory).
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::RosterResponse;
    use crate::api::handlers::system::{HealthResponse, LIVENESS_TEXT};
    use crate::ws::ConnectionSettings;

    fn app(static_dir: &Path) -> (Router, AppState) {
        let state = AppState::new(ConnectionSettings::default());
        (build_app(state.clone(), static_dir), state)
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("bad request");
        };
        let response = app
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status();
        let Ok(body) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn liveness_returns_plain_text() {
        let (app, _) = app(Path::new("does-not-exist"));
        let (status, body) = get_body(app, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, LIVENESS_TEXT.as_bytes());
    }

    #[tokio::test]
    async fn health_reports_counters() {
        let (app, _) = app(Path::new("does-not-exist"));
        let (status, body) = get_body(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let Ok(health) = serde_json::from_slice::<HealthResponse>(&body) else {
            panic!("health body is not JSON");
        };
        assert_eq!(health.status, "healthy");
        assert_eq!(health.participants, 0);
        assert_eq!(health.connections, 0);
    }

    #[tokio::test]
    async fn roster_lists_joined_participants() {
        let (app, state) = app(Path::new("does-not-exist"));
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let id = state.router.join(tx).await;

        let (status, body) = get_body(app.clone(), "/api/v1/participants").await;
        assert_eq!(status, StatusCode::OK);
        let Ok(roster) = serde_json::from_slice::<RosterResponse>(&body) else {
            panic!("roster body is not JSON");
        };
        assert_eq!(roster.count, 1);
        assert_eq!(roster.participants.first().map(|p| p.id), Some(id));

        let (status, _) = get_body(app, &format!("/api/v1/participants/{id}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_participant_is_structured_404() {
        let (app, _) = app(Path::new("does-not-exist"));
        let uri = format!("/api/v1/participants/{}", uuid::Uuid::new_v4());
        let (status, body) = get_body(app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
        assert_eq!(value["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn malformed_participant_id_is_structured_400() {
        let (app, _) = app(Path::new("does-not-exist"));
        let (status, body) = get_body(app, "/api/v1/participants/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
        assert_eq!(value["error"]["code"], 1002);
        assert!(value["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn serves_static_bundle() {
        let dir = std::env::temp_dir().join(format!("presence-static-{}", uuid::Uuid::new_v4()));
        let written = std::fs::create_dir_all(&dir)
            .and_then(|()| std::fs::write(dir.join("index.html"), "<h1>lobby</h1>"))
            .and_then(|()| std::fs::write(dir.join("app.js"), "console.log(1)"));
        assert!(written.is_ok());

        let (app, _) = app(&dir);
        let (status, body) = get_body(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>lobby</h1>");

        let (status, body) = get_body(app.clone(), "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"console.log(1)");

        let (status, _) = get_body(app, "/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
