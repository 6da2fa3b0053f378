use std::env;
use std::path::PathBuf;

/// Storage configuration.
///
/// Reads from the `DAYBOOK_DATA_DIR` environment variable, falling back to
/// the current directory when unset.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding `notes.json` and `labels.json`.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// The directory used when no environment variable is set.
    pub const DEFAULT_DIR: &str = ".";

    /// Environment variable consulted by [`StoreConfig::from_env`].
    pub const ENV_VAR: &str = "DAYBOOK_DATA_DIR";

    /// File name of the notes store.
    pub const NOTES_FILE: &str = "notes.json";

    /// File name of the labels store.
    pub const LABELS_FILE: &str = "labels.json";

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let data_dir = env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_DIR.to_owned());
        Self::new(data_dir)
    }

    /// Build a config from an explicit directory (useful for tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(Self::NOTES_FILE)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.data_dir.join(Self::LABELS_FILE)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir() {
        let cfg = StoreConfig::new(StoreConfig::DEFAULT_DIR);
        assert_eq!(cfg.data_dir, PathBuf::from("."));
    }

    #[test]
    fn file_paths_live_in_data_dir() {
        let cfg = StoreConfig::new("/var/lib/daybook");
        assert_eq!(cfg.notes_path(), PathBuf::from("/var/lib/daybook/notes.json"));
        assert_eq!(cfg.labels_path(), PathBuf::from("/var/lib/daybook/labels.json"));
    }
}
