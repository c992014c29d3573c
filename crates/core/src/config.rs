use std::path::{Path, PathBuf};

/// Where a gallery keeps its database and uploaded files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub media_root: PathBuf,
}

impl Config {
    pub fn new(database: impl Into<PathBuf>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            media_root: media_root.into(),
        }
    }

    /// `$HOME/.gallery/catalog.db` and `$HOME/.gallery/media`.
    pub fn default_paths() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::under(&PathBuf::from(home).join(".gallery"))
    }

    /// Database and media directory inside a single base directory.
    pub fn under(base: &Path) -> Self {
        Self::new(base.join("catalog.db"), base.join("media"))
    }
}
