//! Process-local game store, used for tests and throwaway local runs.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{game_store::GameStore, models::GameConfigEntity, storage::StorageResult};

/// Game store backed by a concurrent in-memory map.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    games: Arc<DashMap<String, GameConfigEntity>>,
}

impl MemoryGameStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no game has been saved yet.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryGameStore {
    fn save_game(&self, game: GameConfigEntity) -> BoxFuture<'static, StorageResult<()>> {
        let games = self.games.clone();
        Box::pin(async move {
            games
                .entry(game.id.clone())
                .and_modify(|existing| {
                    existing.config = game.config.clone();
                    existing.updated_at = game.updated_at;
                })
                .or_insert(game);
            Ok(())
        })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameConfigEntity>>> {
        let games = self.games.clone();
        Box::pin(async move { Ok(games.get(&id).map(|entry| entry.value().clone())) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn upsert_replaces_config_and_keeps_creation_time() {
        let store = MemoryGameStore::new();
        let first = GameConfigEntity::new("abc123", json!({"player": "a.png"}));
        let created_at = first.created_at;
        store.save_game(first).await.unwrap();

        let mut second = GameConfigEntity::new("abc123", json!({"player": "b.png"}));
        second.created_at = SystemTime::UNIX_EPOCH;
        second.updated_at = created_at + Duration::from_secs(5);
        store.save_game(second).await.unwrap();

        let stored = store.find_game("abc123".into()).await.unwrap().unwrap();
        assert_eq!(stored.config, json!({"player": "b.png"}));
        assert_eq!(stored.created_at, created_at);
        assert_eq!(stored.updated_at, created_at + Duration::from_secs(5));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = MemoryGameStore::new();
        assert!(store.find_game("missing".into()).await.unwrap().is_none());
    }
}
