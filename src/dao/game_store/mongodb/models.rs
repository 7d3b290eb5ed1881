use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::models::GameConfigEntity;

/// Shape of a document in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub config: Value,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<GameConfigEntity> for MongoGameDocument {
    fn from(value: GameConfigEntity) -> Self {
        Self {
            id: value.id,
            config: value.config,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoGameDocument> for GameConfigEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: value.id,
            config: value.config,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn doc_id(id: &str) -> Document {
    doc! {"_id": id}
}
