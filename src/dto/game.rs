use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::GameConfigEntity,
    dto::{
        format_system_time,
        validation::{validate_config, validate_game_id},
    },
};

/// Text shown on the game-over screen when the skin does not set one.
pub const DEFAULT_GAME_OVER_TEXT: &str = "You lost!";

/// Payload of `POST /api/save`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveGameRequest {
    /// Id to save under. When absent or blank the server generates one.
    /// Numbers are accepted and read as their decimal text.
    #[serde(default, deserialize_with = "string_or_number")]
    #[schema(value_type = Option<String>)]
    pub id: Option<String>,
    /// Skin description: `player`, `pipe`, `bg`, `bgm`, `dead`, `goImg`, `goText`
    /// plus any extra keys, stored verbatim.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: Option<Value>,
}

impl SaveGameRequest {
    /// Trimmed client id, `None` when the server should pick one.
    pub fn requested_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl Validate for SaveGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_config(self.config.as_ref()) {
            errors.add("config", e);
        }

        if let Some(id) = self.requested_id() {
            if let Err(e) = validate_game_id(id) {
                errors.add("id", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "id must be a string or a number, got {other}"
        ))),
    }
}

/// Returned after a successful save.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveGameResponse {
    /// Always `true`.
    pub success: bool,
    /// Id to share; `/play.html?id=<id>` loads the skin.
    pub id: String,
}

impl SaveGameResponse {
    /// Successful save under `id`.
    pub fn new(id: String) -> Self {
        Self { success: true, id }
    }
}

/// Config of a stored game, as served by `GET /api/game/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameConfigResponse {
    /// Always `true`.
    pub success: bool,
    /// The exact JSON object that was saved.
    #[schema(value_type = Object)]
    pub config: Value,
    /// RFC 3339 timestamp of the first save.
    pub created_at: String,
    /// RFC 3339 timestamp of the latest save.
    pub updated_at: String,
}

impl From<GameConfigEntity> for GameConfigResponse {
    fn from(game: GameConfigEntity) -> Self {
        Self {
            success: true,
            config: game.config,
            created_at: format_system_time(game.created_at),
            updated_at: format_system_time(game.updated_at),
        }
    }
}

/// Lenient typed view over a stored config.
///
/// Values that are missing or are not strings read as `None`; the raw
/// config is never rewritten through this view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skin {
    /// Player sprite URL or data URI.
    pub player: Option<String>,
    /// Obstacle sprite.
    pub pipe: Option<String>,
    /// Background image.
    pub bg: Option<String>,
    /// Background music.
    pub bgm: Option<String>,
    /// Sound played on death.
    pub dead: Option<String>,
    /// Game-over image (`goImg`).
    pub go_img: Option<String>,
    /// Game-over text (`goText`).
    pub go_text: Option<String>,
}

impl Skin {
    /// Read the known keys of `config`.
    pub fn from_config(config: &Value) -> Self {
        let Some(map) = config.as_object() else {
            return Self::default();
        };
        Self {
            player: string_field(map, "player"),
            pipe: string_field(map, "pipe"),
            bg: string_field(map, "bg"),
            bgm: string_field(map, "bgm"),
            dead: string_field(map, "dead"),
            go_img: string_field(map, "goImg"),
            go_text: string_field(map, "goText"),
        }
    }

    /// `goText`, or [`DEFAULT_GAME_OVER_TEXT`] when it is missing or empty.
    pub fn game_over_text(&self) -> &str {
        self.go_text.as_deref().unwrap_or(DEFAULT_GAME_OVER_TEXT)
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
