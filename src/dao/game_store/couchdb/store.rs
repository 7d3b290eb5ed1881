use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::dao::{game_store::GameStore, models::GameConfigEntity, storage::StorageResult};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{CouchGameDocument, game_doc_id},
};

/// Game store keeping each config as a `game::{id}` CouchDB document.
#[derive(Clone)]
pub struct CouchGameStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchGameStore {
    /// Build the HTTP client and make sure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let auth = config
            .username
            .zip(config.password)
            .map(|(user, pass)| (Arc::<str>::from(user), Arc::<str>::from(pass)));
        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            database: Arc::from(config.database),
            auth,
        };

        store.ensure_database().await?;
        debug!(database = %store.database, "CouchDB database ready");
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn document(&self, method: Method, doc_id: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.database_url(), doc_id);
        self.authorize(self.client.request(method, url))
    }

    async fn database_status(&self, method: Method) -> CouchResult<StatusCode> {
        let response = self
            .authorize(self.client.request(method, self.database_url()))
            .send()
            .await
            .map_err(|source| CouchDaoError::Database {
                database: self.database.to_string(),
                source,
            })?;
        Ok(response.status())
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let status = match self.database_status(Method::GET).await? {
            StatusCode::NOT_FOUND => self.database_status(Method::PUT).await?,
            other => other,
        };
        // 412 means a concurrent creator won the race.
        if status.is_success() || status == StatusCode::PRECONDITION_FAILED {
            Ok(())
        } else {
            Err(CouchDaoError::DatabaseStatus {
                database: self.database.to_string(),
                status,
            })
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .document(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_owned(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response.json::<T>().await.map(Some).map_err(
                |source| CouchDaoError::DecodeResponse {
                    path: doc_id.to_owned(),
                    source,
                },
            ),
            status => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_owned(),
                status,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .document(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_owned(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_owned(),
                status,
            })
        }
    }

    async fn save_game(&self, game: GameConfigEntity) -> CouchResult<()> {
        let doc_id = game_doc_id(&game.id);
        let existing = self.get_document::<CouchGameDocument>(&doc_id).await?;

        let mut doc = CouchGameDocument::from_entity(game, None);
        if let Some(existing) = existing {
            doc.rev = existing.rev;
            doc.game.created_at = existing.game.created_at;
        }
        self.put_document(&doc_id, &doc).await
    }

    async fn find_game(&self, id: &str) -> CouchResult<Option<GameConfigEntity>> {
        let doc = self
            .get_document::<CouchGameDocument>(&game_doc_id(id))
            .await?;
        Ok(doc.map(CouchGameDocument::into_entity))
    }

    async fn ping(&self) -> CouchResult<()> {
        let status = self.database_status(Method::GET).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::DatabaseStatus {
                database: self.database.to_string(),
                status,
            })
        }
    }
}

impl GameStore for CouchGameStore {
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
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
