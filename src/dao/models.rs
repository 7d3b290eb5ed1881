use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

/// Game skin persisted by the storage layer, keyed by its short identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfigEntity {
    /// Primary key of the game (short, URL-safe).
    pub id: String,
    /// Opaque JSON object describing the skin (sprites, sounds, game-over text).
    pub config: Value,
    /// First time this id was saved.
    pub created_at: SystemTime,
    /// Last time the config behind this id was replaced.
    pub updated_at: SystemTime,
}

impl GameConfigEntity {
    /// Build a fresh entity stamped with the current time.
    pub fn new(id: impl Into<String>, config: Value) -> Self {
        let now = SystemTime::now();
        Self {
            id: id.into(),
            config,
            created_at: now,
            updated_at: now,
        }
    }
}
