use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    dto::replay::ReplayResponse,
    engine::ReplayLog,
    error::{AppError, ErrorBody},
    services::replay_service,
    state::SharedState,
};

/// Replay verification routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/game/{id}/replay", post(replay_game))
}

/// Re-simulate a recorded run of game `id` and return the verified score.
#[utoipa::path(
    post,
    path = "/api/game/{id}/replay",
    tag = "game",
    params(("id" = String, Path, description = "Game the run was played on")),
    request_body = ReplayLog,
    responses(
        (status = 200, description = "Replay verdict", body = ReplayResponse),
        (status = 400, description = "Malformed log", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    )
)]
pub async fn replay_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(log): Json<ReplayLog>,
) -> Result<Json<ReplayResponse>, AppError> {
    let verdict = replay_service::replay_game(&state, &id, log).await?;
    Ok(Json(verdict))
}
