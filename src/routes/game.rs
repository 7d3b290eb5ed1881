use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::game::{GameConfigResponse, SaveGameRequest, SaveGameResponse},
    error::{AppError, ErrorBody},
    services::game_service,
    state::SharedState,
};

/// Routes storing and serving shared game configs.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/save", post(save_game))
        .route("/api/game/{id}", get(load_game))
}

/// Save a game config and return the id to share.
#[utoipa::path(
    post,
    path = "/api/save",
    tag = "game",
    request_body = SaveGameRequest,
    responses(
        (status = 200, description = "Config saved", body = SaveGameResponse),
        (status = 400, description = "Missing or malformed config or id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
        (status = 503, description = "No storage backend available", body = ErrorBody)
    )
)]
pub async fn save_game(
    State(state): State<SharedState>,
    Json(payload): Json<SaveGameRequest>,
) -> Result<Json<SaveGameResponse>, AppError> {
    let saved = game_service::save_game(&state, payload).await?;
    Ok(Json(saved))
}

/// Fetch the config saved under `id`.
#[utoipa::path(
    get,
    path = "/api/game/{id}",
    tag = "game",
    params(("id" = String, Path, description = "Identifier returned by `/api/save`")),
    responses(
        (status = 200, description = "Stored config", body = GameConfigResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Unknown id", body = ErrorBody)
    )
)]
pub async fn load_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameConfigResponse>, AppError> {
    let game = game_service::load_game(&state, &id).await?;
    Ok(Json(game))
}
