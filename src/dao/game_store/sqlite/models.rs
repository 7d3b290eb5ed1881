use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::Row;

use crate::dao::models::GameConfigEntity;

use super::error::{SqliteDaoError, SqliteResult};

pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS games (
        id         TEXT PRIMARY KEY,
        config     TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
";

pub const UPSERT_GAME: &str = "
    INSERT INTO games (id, config, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(id) DO UPDATE SET
        config = excluded.config,
        updated_at = excluded.updated_at
";

pub const SELECT_GAME: &str =
    "SELECT id, config, created_at, updated_at FROM games WHERE id = ?1 LIMIT 1";

/// Row shape of the `games` table before the config is parsed.
pub struct GameRow {
    pub id: String,
    pub config: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl GameRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            config: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }

    pub fn from_entity(game: &GameConfigEntity) -> SqliteResult<Self> {
        let config =
            serde_json::to_string(&game.config).map_err(|source| SqliteDaoError::Encode {
                id: game.id.clone(),
                source,
            })?;
        Ok(Self {
            id: game.id.clone(),
            config,
            created_at: to_millis(game.created_at),
            updated_at: to_millis(game.updated_at),
        })
    }

    pub fn into_entity(self) -> SqliteResult<GameConfigEntity> {
        let config = serde_json::from_str(&self.config).map_err(|source| SqliteDaoError::Decode {
            id: self.id.clone(),
            source,
        })?;
        Ok(GameConfigEntity {
            id: self.id,
            config,
            created_at: from_millis(self.created_at),
            updated_at: from_millis(self.updated_at),
        })
    }
}

fn to_millis(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn from_millis(millis: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}
