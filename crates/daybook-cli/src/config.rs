//! Configuration file management for daybook.
//!
//! Provides a TOML-based config file at `~/.config/daybook/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use daybook_core::oracle::{DisabledOracle, GeminiConfig, GeminiOracle, Oracle};
use daybook_store::StoreConfig;

pub const API_KEY_ENV: &str = "DAYBOOK_ORACLE_API_KEY";
pub const MODEL_ENV: &str = "DAYBOOK_ORACLE_MODEL";
pub const BASE_URL_ENV: &str = "DAYBOOK_ORACLE_URL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub oracle: OracleSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory holding `notes.json` and `labels.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OracleSection {
    /// Without a key the oracle is disabled and every feature that can
    /// fall back does so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the daybook config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/daybook` or `~/.config/daybook`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("daybook");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("daybook")
}

/// Return the path to the daybook config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed. Sets file permissions to 0600 on Unix, since it may hold an API
/// key.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DaybookConfig {
    pub store_config: StoreConfig,
    /// `None` when no API key is configured.
    pub oracle: Option<GeminiConfig>,
}

impl DaybookConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `DAYBOOK_DATA_DIR` > `storage.data_dir` > `.`
    /// - API key: `DAYBOOK_ORACLE_API_KEY` > `oracle.api_key` > none (oracle disabled)
    /// - Model: `DAYBOOK_ORACLE_MODEL` > `oracle.model` > `gemini-1.5-flash`
    /// - Base URL: `DAYBOOK_ORACLE_URL` > `oracle.base_url` > the public API
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn resolve(cli_data_dir: Option<&Path>) -> Result<Self> {
        let path = config_path();
        let file_config = if path.exists() {
            load_config_from(&path)?
        } else {
            ConfigFile::default()
        };
        Ok(Self::resolve_with(cli_data_dir, file_config))
    }

    fn resolve_with(cli_data_dir: Option<&Path>, file: ConfigFile) -> Self {
        let data_dir = if let Some(dir) = cli_data_dir {
            dir.to_path_buf()
        } else if let Ok(dir) = std::env::var(StoreConfig::ENV_VAR) {
            PathBuf::from(dir)
        } else if let Some(dir) = file.storage.data_dir {
            dir
        } else {
            PathBuf::from(StoreConfig::DEFAULT_DIR)
        };

        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let oracle = env(API_KEY_ENV)
            .or(file.oracle.api_key)
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| {
                let mut gemini = GeminiConfig::new(api_key);
                if let Some(model) = env(MODEL_ENV).or(file.oracle.model) {
                    gemini.model = model;
                }
                if let Some(url) = env(BASE_URL_ENV).or(file.oracle.base_url) {
                    gemini.base_url = url;
                }
                if let Some(secs) = file.oracle.timeout_secs {
                    gemini.timeout = Duration::from_secs(secs);
                }
                gemini
            });

        Self {
            store_config: StoreConfig::new(data_dir),
            oracle,
        }
    }

    /// Build the configured oracle, or a disabled one when no key is set.
    pub fn build_oracle(&self) -> Result<Arc<dyn Oracle>> {
        match &self.oracle {
            Some(gemini) => {
                let oracle =
                    GeminiOracle::new(gemini.clone()).context("failed to build oracle client")?;
                Ok(Arc::new(oracle))
            }
            None => {
                tracing::warn!("no oracle API key configured; plans and categories use fallbacks");
                Ok(Arc::new(DisabledOracle::default()))
            }
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
