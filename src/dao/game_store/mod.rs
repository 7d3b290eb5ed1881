/// CouchDB backend.
#[cfg(feature = "couch-store")]
pub mod couchdb;
/// In-memory backend.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;
/// SQLite backend.
#[cfg(feature = "sqlite-store")]
pub mod sqlite;

use std::{env, fmt, str::FromStr, sync::Arc};

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dao::models::GameConfigEntity;
use crate::dao::storage::StorageResult;

/// Environment variable selecting the storage backend.
pub const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";

/// Abstraction over the persistence layer for game configs.
pub trait GameStore: Send + Sync {
    /// Insert the config or replace the one already stored under the same id.
    /// The `created_at` of an existing record is kept.
    fn save_game(&self, game: GameConfigEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up the config stored under `id`.
    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameConfigEntity>>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Storage backends the server knows how to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// Process-local map, lost on restart.
    Memory,
    /// Relational `games` table in a SQLite file.
    #[default]
    Sqlite,
    /// `games` collection in MongoDB.
    Mongo,
    /// `game::{id}` documents in CouchDB.
    Couch,
}

/// `STORAGE_BACKEND` named no known backend.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown storage backend `{0}` (expected memory, sqlite, mongo or couch)")]
pub struct UnknownStorageKind(String);

impl FromStr for StorageKind {
    type Err = UnknownStorageKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "couch" | "couchdb" => Ok(Self::Couch),
            _ => Err(UnknownStorageKind(value.to_owned())),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Mongo => "mongo",
            Self::Couch => "couch",
        };
        f.write_str(name)
    }
}

impl StorageKind {
    /// Read [`STORAGE_BACKEND_ENV`], defaulting to SQLite when unset or empty.
    pub fn from_env() -> Result<Self, UnknownStorageKind> {
        match env::var(STORAGE_BACKEND_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::default()),
        }
    }
}

/// Connect the selected backend using its own environment configuration.
pub async fn connect(kind: StorageKind) -> StorageResult<Arc<dyn GameStore>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(memory::MemoryGameStore::new())),
        StorageKind::Sqlite => connect_sqlite().await,
        StorageKind::Mongo => connect_mongo().await,
        StorageKind::Couch => connect_couch().await,
    }
}

#[cfg(feature = "sqlite-store")]
async fn connect_sqlite() -> StorageResult<Arc<dyn GameStore>> {
    let config = sqlite::SqliteConfig::from_env();
    let store = sqlite::SqliteGameStore::open(config).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite-store"))]
async fn connect_sqlite() -> StorageResult<Arc<dyn GameStore>> {
    Err(crate::dao::storage::StorageError::Unsupported("sqlite"))
}

#[cfg(feature = "mongo-store")]
async fn connect_mongo() -> StorageResult<Arc<dyn GameStore>> {
    let config = mongodb::MongoConfig::from_env().await?;
    let store = mongodb::MongoGameStore::connect(config).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongo-store"))]
async fn connect_mongo() -> StorageResult<Arc<dyn GameStore>> {
    Err(crate::dao::storage::StorageError::Unsupported("mongo"))
}

#[cfg(feature = "couch-store")]
async fn connect_couch() -> StorageResult<Arc<dyn GameStore>> {
    let config = couchdb::CouchConfig::from_env()?;
    let store = couchdb::CouchGameStore::connect(config).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "couch-store"))]
async fn connect_couch() -> StorageResult<Arc<dyn GameStore>> {
    Err(crate::dao::storage::StorageError::Unsupported("couch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("memory".parse(), Ok(StorageKind::Memory));
        assert_eq!(" SQLite ".parse(), Ok(StorageKind::Sqlite));
        assert_eq!("mongodb".parse(), Ok(StorageKind::Mongo));
        assert_eq!("couch".parse(), Ok(StorageKind::Couch));
        assert!("postgres".parse::<StorageKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in [
            StorageKind::Memory,
            StorageKind::Sqlite,
            StorageKind::Mongo,
            StorageKind::Couch,
        ] {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }
}
