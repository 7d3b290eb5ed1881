//! Application-level configuration loading: physics tuning, body limits and static assets.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::engine::Physics;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FLOPPY_BACK_CONFIG_PATH";
/// Base64 images make saved configs large.
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_GENERATED_ID_LENGTH: usize = 8;
const MIN_GENERATED_ID_LENGTH: usize = 4;
const MAX_GENERATED_ID_LENGTH: usize = 32;
const DEFAULT_FRONTEND_DIR: &str = "frontend";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    physics: Physics,
    max_body_bytes: usize,
    generated_id_length: usize,
    frontend_dir: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        max_body_bytes = app_config.max_body_bytes,
                        frontend_dir = %app_config.frontend_dir.display(),
                        "loaded application config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document. Absent fields keep their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Tuning used for replays.
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Largest accepted request body, in bytes.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Length of server-generated game ids.
    pub fn generated_id_length(&self) -> usize {
        self.generated_id_length
    }

    /// Directory holding the static player/editor pages.
    pub fn frontend_dir(&self) -> &PathBuf {
        &self.frontend_dir
    }

    /// Point the static file service at another directory.
    pub fn with_frontend_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frontend_dir = dir.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            generated_id_length: DEFAULT_GENERATED_ID_LENGTH,
            frontend_dir: PathBuf::from(DEFAULT_FRONTEND_DIR),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
#[serde(default)]
struct RawConfig {
    physics: Option<Physics>,
    max_body_bytes: Option<usize>,
    generated_id_length: Option<usize>,
    frontend_dir: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            physics: value
                .physics
                .and_then(|physics| match physics.validate() {
                    Ok(()) => Some(physics),
                    Err(err) => {
                        warn!(error = %err, "ignoring physics overrides; using defaults");
                        None
                    }
                })
                .unwrap_or(defaults.physics),
            max_body_bytes: value
                .max_body_bytes
                .filter(|bytes| *bytes > 0)
                .unwrap_or(defaults.max_body_bytes),
            generated_id_length: value
                .generated_id_length
                .map(|len| len.clamp(MIN_GENERATED_ID_LENGTH, MAX_GENERATED_ID_LENGTH))
                .unwrap_or(defaults.generated_id_length),
            frontend_dir: value
                .frontend_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dir),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.max_body_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.generated_id_length(), 8);
        assert_eq!(config.frontend_dir(), &PathBuf::from("frontend"));
        assert_eq!(config.physics().gravity, Physics::default().gravity);
    }

    #[test]
    fn partial_physics_override_keeps_other_defaults() {
        let config = AppConfig::from_json(
            r#"{ "physics": { "gravity": 1500.0 }, "max_body_bytes": 1024, "frontend_dir": "public" }"#,
        )
        .unwrap();
        assert_eq!(config.physics().gravity, 1500.0);
        assert_eq!(config.physics().gap, Physics::default().gap);
        assert_eq!(config.max_body_bytes(), 1024);
        assert_eq!(config.frontend_dir(), &PathBuf::from("public"));
    }

    #[test]
    fn out_of_range_values_are_clamped_or_ignored() {
        let config =
            AppConfig::from_json(r#"{ "generated_id_length": 1, "max_body_bytes": 0 }"#).unwrap();
        assert_eq!(config.generated_id_length(), MIN_GENERATED_ID_LENGTH);
        assert_eq!(config.max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn unusable_physics_falls_back_to_defaults() {
        let config = AppConfig::from_json(
            r#"{ "physics": { "max_frame_step": -0.01 }, "max_body_bytes": 2048 }"#,
        )
        .unwrap();
        assert_eq!(config.physics(), &Physics::default());
        assert_eq!(config.max_body_bytes(), 2048);

        let config =
            AppConfig::from_json(r#"{ "physics": { "gap": 100.0, "min_gap": 110.0 } }"#).unwrap();
        assert_eq!(config.physics(), &Physics::default());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }
}
