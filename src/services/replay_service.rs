use tracing::info;

use crate::{
    dto::{game::Skin, replay::ReplayResponse},
    engine::{ReplayLog, replay},
    error::ServiceError,
    services::game_service,
    state::SharedState,
};

/// Re-simulate `log` against the physics tuning and report the verdict for game `id`.
pub async fn replay_game(
    state: &SharedState,
    id: &str,
    log: ReplayLog,
) -> Result<ReplayResponse, ServiceError> {
    let game = game_service::find_game(state, id).await?;
    log.validate()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let physics = *state.config().physics();
    let outcome = tokio::task::spawn_blocking(move || replay(&log, &physics))
        .await
        .map_err(|err| ServiceError::Internal(format!("replay worker failed: {err}")))?
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    info!(
        id = %id,
        score = outcome.score,
        alive = outcome.alive,
        frames = outcome.frames_simulated,
        "replay verified"
    );

    let skin = Skin::from_config(&game.config);
    Ok(ReplayResponse::new(
        game.id,
        outcome,
        skin.game_over_text().to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            game_store::{GameStore, memory::MemoryGameStore},
            models::GameConfigEntity,
        },
        engine::{Canvas, DeathCause},
        state::AppState,
    };

    async fn state_with_game() -> SharedState {
        let store = Arc::new(MemoryGameStore::new());
        store
            .save_game(GameConfigEntity::new(
                "flappy",
                json!({"player": "p.png", "pipe": "q.png", "goText": "Splat!"}),
            ))
            .await
            .unwrap();
        AppState::with_store(AppConfig::default(), store).await
    }

    fn log(frames: u32, flaps: Vec<u32>) -> ReplayLog {
        ReplayLog {
            seed: 42,
            canvas: Canvas::new(400.0, 600.0),
            sprite: None,
            frame_ms: 16,
            frames,
            flaps,
        }
    }

    #[tokio::test]
    async fn idle_run_hits_the_floor() {
        let state = state_with_game().await;
        let response = replay_game(&state, "flappy", log(600, vec![]))
            .await
            .unwrap();
        assert!(!response.alive);
        assert_eq!(response.score, 0);
        assert_eq!(response.death.map(|d| d.cause), Some(DeathCause::Floor));
        assert_eq!(response.game_over_text, "Splat!");
    }

    #[tokio::test]
    async fn malformed_log_is_invalid_input() {
        let state = state_with_game().await;
        let err = replay_game(&state, "flappy", log(10, vec![5, 3]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let state = state_with_game().await;
        let err = replay_game(&state, "missing", log(10, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
