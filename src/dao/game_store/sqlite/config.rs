/// Environment variable holding the database file path.
const SQLITE_PATH_ENV: &str = "SQLITE_PATH";
/// Database file used when [`SQLITE_PATH_ENV`] is unset.
const DEFAULT_SQLITE_PATH: &str = "floppy.db";

/// Runtime configuration describing where the SQLite database lives.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Filesystem path, or `:memory:` for a private in-memory database.
    pub path: String,
}

impl SqliteConfig {
    /// Database file at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Ephemeral database that disappears with the connection.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Build a configuration from [`SQLITE_PATH_ENV`], falling back to [`DEFAULT_SQLITE_PATH`].
    pub fn from_env() -> Self {
        let path = std::env::var(SQLITE_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_owned());
        Self::new(path)
    }
}
