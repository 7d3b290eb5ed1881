mod config;
mod error;
mod models;
mod store;

pub use config::SqliteConfig;
pub use error::SqliteDaoError;
pub use store::SqliteGameStore;

use crate::dao::storage::StorageError;

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::Decode { id, source } => StorageError::Corrupt {
                id,
                message: source.to_string(),
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
