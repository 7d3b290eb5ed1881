use axum::{Router, extract::DefaultBodyLimit};

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Static editor and player pages.
pub mod frontend;
/// Save and load endpoints.
pub mod game;
/// Liveness and storage health.
pub mod health;
/// Replay verification endpoint.
pub mod replay;

/// Compose all route trees, wiring in shared state, documentation and static pages.
pub fn router(state: SharedState) -> Router<()> {
    let body_limit = state.config().max_body_bytes();
    let api_router = health::router()
        .merge(game::router())
        .merge(replay::router())
        .layer(DefaultBodyLimit::max(body_limit));

    let frontend = frontend::service(state.config().frontend_dir());

    api_router
        .merge(docs::router())
        .fallback_service(frontend)
        .with_state(state)
}
