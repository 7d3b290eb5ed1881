use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::models::GameConfigEntity;

pub const GAME_PREFIX: &str = "game::";

/// A game config stored as a CouchDB document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchGameDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub game: GameBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBody {
    pub game_id: String,
    pub config: Value,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl CouchGameDocument {
    pub fn from_entity(game: GameConfigEntity, rev: Option<String>) -> Self {
        Self {
            id: game_doc_id(&game.id),
            rev,
            game: GameBody {
                game_id: game.id,
                config: game.config,
                created_at: game.created_at,
                updated_at: game.updated_at,
            },
        }
    }

    pub fn into_entity(self) -> GameConfigEntity {
        GameConfigEntity {
            id: self.game.game_id,
            config: self.game.config,
            created_at: self.game.created_at,
            updated_at: self.game.updated_at,
        }
    }
}

pub fn game_doc_id(id: &str) -> String {
    format!("{GAME_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_carries_couch_metadata() {
        let entity = GameConfigEntity::new("ab12cd34", json!({"player": "p.png"}));
        let doc = CouchGameDocument::from_entity(entity.clone(), Some("3-abc".into()));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_id"], "game::ab12cd34");
        assert_eq!(value["_rev"], "3-abc");
        assert_eq!(value["config"], json!({"player": "p.png"}));

        let fresh = CouchGameDocument::from_entity(entity.clone(), None);
        let value = serde_json::to_value(&fresh).unwrap();
        assert!(value.get("_rev").is_none());

        let decoded: CouchGameDocument = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.into_entity(), entity);
    }
}
