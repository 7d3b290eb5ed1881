use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::dao::{game_store::GameStore, models::GameConfigEntity, storage::StorageResult};

use super::{
    config::SqliteConfig,
    error::{SqliteDaoError, SqliteResult},
    models::{GameRow, SCHEMA, SELECT_GAME, UPSERT_GAME},
};

/// Game store persisting configs in the relational `games` table.
#[derive(Clone)]
pub struct SqliteGameStore {
    inner: Arc<SqliteInner>,
}

struct SqliteInner {
    conn: Mutex<Connection>,
    config: SqliteConfig,
}

fn open_connection(config: &SqliteConfig) -> SqliteResult<Connection> {
    let conn = Connection::open(&config.path).map_err(|source| SqliteDaoError::Open {
        path: config.path.clone(),
        source,
    })?;
    conn.execute_batch("PRAGMA busy_timeout = 5000;")
        .map_err(|source| SqliteDaoError::Schema { source })?;
    conn.execute_batch(SCHEMA)
        .map_err(|source| SqliteDaoError::Schema { source })?;
    Ok(conn)
}

impl SqliteInner {
    fn with_conn<T>(&self, work: impl FnOnce(&Connection) -> SqliteResult<T>) -> SqliteResult<T> {
        let guard = self.conn.lock().map_err(|_| SqliteDaoError::Poisoned)?;
        work(&guard)
    }

    fn save_game(&self, game: &GameConfigEntity) -> SqliteResult<()> {
        let row = GameRow::from_entity(game)?;
        self.with_conn(|conn| {
            conn.execute(
                UPSERT_GAME,
                params![row.id, row.config, row.created_at, row.updated_at],
            )
            .map_err(|source| SqliteDaoError::SaveGame {
                id: row.id.clone(),
                source,
            })?;
            Ok(())
        })
    }

    fn find_game(&self, id: &str) -> SqliteResult<Option<GameConfigEntity>> {
        let row = self.with_conn(|conn| {
            conn.query_row(SELECT_GAME, params![id], GameRow::from_row)
                .optional()
                .map_err(|source| SqliteDaoError::LoadGame {
                    id: id.to_owned(),
                    source,
                })
        })?;
        row.map(GameRow::into_entity).transpose()
    }

    fn ping(&self) -> SqliteResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|source| SqliteDaoError::HealthCheck { source })?;
            Ok(())
        })
    }

    fn reconnect(&self) -> SqliteResult<()> {
        let fresh = open_connection(&self.config)?;
        let mut guard = self.conn.lock().map_err(|_| SqliteDaoError::Poisoned)?;
        *guard = fresh;
        debug!(path = %self.config.path, "reopened SQLite connection");
        Ok(())
    }
}

impl SqliteGameStore {
    /// Open the database and make sure the `games` table exists.
    pub async fn open(config: SqliteConfig) -> SqliteResult<Self> {
        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&config)?;
            debug!(path = %config.path, "SQLite games table ready");
            Ok::<_, SqliteDaoError>(Self {
                inner: Arc::new(SqliteInner {
                    conn: Mutex::new(conn),
                    config,
                }),
            })
        })
        .await
        .map_err(|source| SqliteDaoError::Worker { source })?
    }

    /// Run blocking SQLite work off the async runtime.
    async fn blocking<T, F>(&self, work: F) -> SqliteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteInner) -> SqliteResult<T> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || work(inner.as_ref()))
            .await
            .map_err(|source| SqliteDaoError::Worker { source })?
    }
}

impl GameStore for SqliteGameStore {
    fn save_game(&self, game: GameConfigEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .blocking(move |inner| inner.save_game(&game))
                .await
                .map_err(Into::into)
        })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameConfigEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .blocking(move |inner| inner.find_game(&id))
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.blocking(SqliteInner::ping).await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .blocking(SqliteInner::reconnect)
                .await
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use serde_json::json;

    use super::*;
    use crate::dao::storage::StorageError;

    async fn store() -> SqliteGameStore {
        SqliteGameStore::open(SqliteConfig::in_memory())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn saved_config_round_trips() {
        let store = store().await;
        let config = json!({
            "player": "data:image/png;base64,AAAA",
            "pipe": "https://cdn.example/pipe.png",
            "goText": "Try again!",
            "extra": {"nested": [1, 2.5, null, true]}
        });
        store
            .save_game(GameConfigEntity::new("k3y9x0ab", config.clone()))
            .await
            .unwrap();

        let loaded = store.find_game("k3y9x0ab".into()).await.unwrap().unwrap();
        assert_eq!(loaded.id, "k3y9x0ab");
        assert_eq!(loaded.config, config);
    }

    #[tokio::test]
    async fn upsert_keeps_creation_time() {
        let store = store().await;
        let mut first = GameConfigEntity::new("same", json!({"player": "a"}));
        first.created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        first.updated_at = first.created_at;
        store.save_game(first).await.unwrap();

        let mut second = GameConfigEntity::new("same", json!({"player": "b"}));
        second.created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(9_000);
        second.updated_at = second.created_at;
        store.save_game(second).await.unwrap();

        let loaded = store.find_game("same".into()).await.unwrap().unwrap();
        assert_eq!(loaded.config, json!({"player": "b"}));
        assert_eq!(
            loaded.created_at,
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)
        );
        assert_eq!(
            loaded.updated_at,
            SystemTime::UNIX_EPOCH + Duration::from_secs(9_000)
        );
    }

    #[tokio::test]
    async fn missing_game_is_none() {
        let store = store().await;
        assert!(store.find_game("nope".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_row_reports_decode_error() {
        let store = store().await;
        store
            .inner
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO games (id, config, created_at, updated_at) VALUES ('bad', '{not json', 0, 0)",
                    [],
                )
                .map_err(|source| SqliteDaoError::SaveGame {
                    id: "bad".into(),
                    source,
                })
            })
            .unwrap();

        let err = store.find_game("bad".into()).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref id, .. } if id == "bad"));
    }

    #[tokio::test]
    async fn health_check_passes_on_open_database() {
        let store = store().await;
        store.health_check().await.unwrap();
    }
}
