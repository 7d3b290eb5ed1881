use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Static editor and player pages. `/play.html` is served from the directory;
/// any other unknown path falls back to `index.html`.
pub fn service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
