use rand::Rng;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    dao::models::GameConfigEntity,
    dto::{
        game::{GameConfigResponse, SaveGameRequest, SaveGameResponse},
        validation::validate_game_id,
    },
    error::ServiceError,
    state::SharedState,
};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Fresh ids tried before giving up on a crowded id space.
const MAX_ID_ATTEMPTS: usize = 5;

/// Store `request.config`, under the client's id when given or a fresh one otherwise.
pub async fn save_game(
    state: &SharedState,
    request: SaveGameRequest,
) -> Result<SaveGameResponse, ServiceError> {
    request
        .validate()
        .map_err(|errors| ServiceError::InvalidInput(errors.to_string()))?;

    let store = state.require_game_store().await?;
    let id = match request.requested_id() {
        Some(id) => id.to_owned(),
        None => {
            let length = state.config().generated_id_length();
            let mut attempt = 0;
            loop {
                let candidate = generate_id(&mut rand::rng(), length);
                if store.find_game(candidate.clone()).await?.is_none() {
                    break candidate;
                }
                attempt += 1;
                warn!(id = %candidate, attempt, "generated game id already taken");
                if attempt >= MAX_ID_ATTEMPTS {
                    return Err(ServiceError::Internal(
                        "could not allocate a free game id".into(),
                    ));
                }
            }
        }
    };

    let config = request.config.unwrap_or_default();
    store.save_game(GameConfigEntity::new(id.clone(), config)).await?;
    info!(id = %id, "game config saved");

    Ok(SaveGameResponse::new(id))
}

/// Fetch the stored config for `id`.
pub async fn load_game(state: &SharedState, id: &str) -> Result<GameConfigResponse, ServiceError> {
    Ok(find_game(state, id).await?.into())
}

pub(crate) async fn find_game(
    state: &SharedState,
    id: &str,
) -> Result<GameConfigEntity, ServiceError> {
    validate_game_id(id).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_game_store().await?;
    let Some(game) = store.find_game(id.to_owned()).await? else {
        debug!(id = %id, "game config not found");
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    Ok(game)
}

/// Random lowercase base-36 id of `length` characters.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    use super::*;
    use crate::{
        config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState,
    };

    async fn state() -> SharedState {
        AppState::with_store(AppConfig::default(), Arc::new(MemoryGameStore::new())).await
    }

    fn request(value: serde_json::Value) -> SaveGameRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn generated_ids_are_lowercase_base36() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let id = generate_id(&mut rng, 8);
            assert_eq!(id.len(), 8);
            assert!(
                id.chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
            );
            assert!(validate_game_id(&id).is_ok());
        }
    }

    #[tokio::test]
    async fn saved_config_loads_back_unchanged() {
        let state = state().await;
        let config = json!({
            "player": "data:image/png;base64,iVBORw0KGgo=",
            "pipe": "https://example.org/pipe.png",
            "goText": "Game over",
            "extra": {"level": 3}
        });

        let saved = save_game(&state, request(json!({"config": config.clone()})))
            .await
            .unwrap();
        assert!(saved.success);
        assert_eq!(saved.id.len(), 8);

        let loaded = load_game(&state, &saved.id).await.unwrap();
        assert!(loaded.success);
        assert_eq!(loaded.config, config);
    }

    #[tokio::test]
    async fn client_id_is_trimmed_and_upserted() {
        let state = state().await;
        let first = save_game(
            &state,
            request(json!({"id": " my-game ", "config": {"player": "a"}})),
        )
        .await
        .unwrap();
        assert_eq!(first.id, "my-game");

        save_game(
            &state,
            request(json!({"id": "my-game", "config": {"player": "b"}})),
        )
        .await
        .unwrap();

        let loaded = load_game(&state, "my-game").await.unwrap();
        assert_eq!(loaded.config, json!({"player": "b"}));
    }

    #[tokio::test]
    async fn rejects_missing_config() {
        let state = state().await;
        let err = save_game(&state, request(json!({"id": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = state().await;
        let err = load_game(&state, "nothere").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "game `nothere` not found"));
    }

    #[tokio::test]
    async fn degraded_state_refuses_requests() {
        let state = AppState::new(AppConfig::default());
        let err = load_game(&state, "abc").await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
