//! Error types shared by the SQLite storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with SQLite.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened or created.
    #[error("failed to open SQLite database at `{path}`")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `games` table failed.
    #[error("failed to prepare SQLite schema")]
    Schema {
        #[source]
        source: rusqlite::Error,
    },
    /// Writing a game row failed.
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Reading a game row failed.
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The config could not be serialized for storage.
    #[error("failed to encode config of game `{id}`")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    /// A stored config is not valid JSON.
    #[error("failed to decode config of game `{id}`")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    /// `SELECT 1` against the connection failed.
    #[error("SQLite health check failed")]
    HealthCheck {
        #[source]
        source: rusqlite::Error,
    },
    /// A previous holder of the connection panicked.
    #[error("SQLite connection lock poisoned")]
    Poisoned,
    /// The blocking worker running the query was cancelled or panicked.
    #[error("SQLite worker task failed")]
    Worker {
        #[source]
        source: tokio::task::JoinError,
    },
}
