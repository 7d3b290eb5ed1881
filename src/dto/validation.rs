//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest id a client may choose for its game.
pub const MAX_GAME_ID_LEN: usize = 64;

/// Validates that a game ID is 1 to 64 characters of `[A-Za-z0-9_-]`.
///
/// # Examples
///
/// ```ignore
/// validate_game_id("k3y9x0ab")    // Ok
/// validate_game_id("my-game_2")   // Ok
/// validate_game_id("")            // Err - empty
/// validate_game_id("../etc")      // Err - invalid characters
/// ```
pub fn validate_game_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_GAME_ID_LEN {
        let mut err = ValidationError::new("game_id_length");
        err.message = Some(
            format!(
                "Game ID must be between 1 and {MAX_GAME_ID_LEN} characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("game_id_format");
        err.message =
            Some("Game ID may only contain letters, digits, '-' and '_'".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a config is present and is a JSON object.
pub fn validate_config(config: Option<&serde_json::Value>) -> Result<(), ValidationError> {
    match config {
        Some(serde_json::Value::Object(_)) => Ok(()),
        Some(serde_json::Value::Null) | None => {
            let mut err = ValidationError::new("config_missing");
            err.message = Some("Missing config in body".into());
            Err(err)
        }
        Some(_) => {
            let mut err = ValidationError::new("config_type");
            err.message = Some("Config must be a JSON object".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_game_id_valid() {
        assert!(validate_game_id("k3y9x0ab").is_ok());
        assert!(validate_game_id("My_Game-2").is_ok());
        assert!(validate_game_id(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_game_id_invalid_length() {
        assert!(validate_game_id("").is_err());
        assert!(validate_game_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_game_id_invalid_format() {
        assert!(validate_game_id("../etc").is_err());
        assert!(validate_game_id("has space").is_err());
        assert!(validate_game_id("emoji🐦").is_err());
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(Some(&json!({"player": "p.png"}))).is_ok());
        assert!(validate_config(Some(&json!({}))).is_ok());
        assert!(validate_config(None).is_err());
        assert!(validate_config(Some(&json!(null))).is_err());
        assert!(validate_config(Some(&json!("player.png"))).is_err());
        assert!(validate_config(Some(&json!([1, 2]))).is_err());
    }
}
