use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::{Client, Collection, Database, bson::doc};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, doc_id},
};
use crate::dao::{game_store::GameStore, models::GameConfigEntity, storage::StorageResult};

const GAME_COLLECTION_NAME: &str = "games";

/// Game store persisting configs in the MongoDB `games` collection.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // Kept so the client outlives every handle derived from it.
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoGameDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn find_document(&self, id: &str) -> MongoResult<Option<MongoGameDocument>> {
        self.collection()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadGame {
                id: id.to_owned(),
                source,
            })
    }

    async fn save_game(&self, game: GameConfigEntity) -> MongoResult<()> {
        let mut document: MongoGameDocument = game.into();
        if let Some(existing) = self.find_document(&document.id).await? {
            document.created_at = existing.created_at;
        }

        self.collection()
            .await
            .replace_one(doc_id(&document.id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveGame {
                id: document.id.clone(),
                source,
            })?;

        Ok(())
    }

    async fn find_game(&self, id: &str) -> MongoResult<Option<GameConfigEntity>> {
        Ok(self.find_document(id).await?.map(Into::into))
    }
}

impl GameStore for MongoGameStore {
    fn save_game(&self, game: GameConfigEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game(game).await.map_err(Into::into) })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameConfigEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(&id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
