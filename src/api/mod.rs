//! REST API over the in-memory tournament snapshot.

pub mod routes;
pub mod state;

use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Assemble the application router. All endpoints live under `/api`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tournament", get(routes::tournament::show))
        .route("/api/settings", put(routes::tournament::update_settings))
        .route("/api/phase", put(routes::tournament::update_phase))
        .route(
            "/api/players",
            get(routes::players::list).post(routes::players::create),
        )
        .route("/api/players/:id", delete(routes::players::remove))
        .route(
            "/api/results/:a/:b",
            put(routes::results::put).delete(routes::results::delete),
        )
        .route("/api/standings", get(routes::tournament::standings))
        .route("/api/schedule", get(routes::tournament::schedule))
        .route("/api/export/text", get(routes::tournament::export_text))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
