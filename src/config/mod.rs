//! Configuration management.
//!
//! Settings come from four places, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables (`REELSYNC_DB`, `REELSYNC_ENDPOINT`, `REELSYNC_USER_AGENT`)
//! 3. The config file, `~/.reelsync/config.json` (or `REELSYNC_CONFIG`)
//! 4. Built-in defaults
//!
//! The database lives at `~/.reelsync/data/reelsync.db` unless overridden.

use crate::error::{Error, Result};
use crate::fetch::http::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.androidhive.info/json/movies.json";

/// Persisted settings file contents.
///
/// Every field is optional; missing fields fall through to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelsyncConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ReelsyncConfig {
    /// Overlay `update` on top of `self`; set fields in `update` win.
    #[must_use]
    pub fn merged(self, update: Self) -> Self {
        Self {
            endpoint: update.endpoint.or(self.endpoint),
            db_path: update.db_path.or(self.db_path),
            user_agent: update.user_agent.or(self.user_agent),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub db_path: PathBuf,
    pub endpoint: String,
    pub user_agent: String,
}

impl Settings {
    /// Resolve settings from flags, environment, config file and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or if
    /// no database location can be determined.
    pub fn resolve(explicit_db: Option<&Path>, explicit_endpoint: Option<&str>) -> Result<Self> {
        let config = load_config()?;
        Self::resolve_with(explicit_db, explicit_endpoint, &config, |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolution core with an injectable environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if no database location can be determined, or if the
    /// user agent is not a valid HTTP header value.
    pub fn resolve_with(
        explicit_db: Option<&Path>,
        explicit_endpoint: Option<&str>,
        config: &ReelsyncConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let db_path = explicit_db
            .map(Path::to_path_buf)
            .or_else(|| env("REELSYNC_DB").map(PathBuf::from))
            .or_else(|| config.db_path.clone())
            .or_else(default_db_path)
            .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;

        let endpoint = explicit_endpoint
            .map(ToString::to_string)
            .or_else(|| env("REELSYNC_ENDPOINT"))
            .or_else(|| config.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let user_agent = env("REELSYNC_USER_AGENT")
            .or_else(|| config.user_agent.clone())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        if reqwest::header::HeaderValue::from_str(&user_agent).is_err() {
            return Err(Error::Config(format!(
                "User agent {user_agent:?} is not a valid HTTP header value"
            )));
        }

        Ok(Self {
            db_path,
            endpoint,
            user_agent,
        })
    }
}

/// Get the global reelsync directory (`~/.reelsync/`).
#[must_use]
pub fn global_reelsync_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".reelsync"))
}

/// Default database location: `~/.reelsync/data/reelsync.db`.
#[must_use]
pub fn default_db_path() -> Option<PathBuf> {
    global_reelsync_dir().map(|dir| dir.join("data").join("reelsync.db"))
}

/// Get the config file path, honoring `REELSYNC_CONFIG`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("REELSYNC_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    global_reelsync_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load the configuration file, or defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<ReelsyncConfig> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<ReelsyncConfig> {
    if !path.exists() {
        return Ok(ReelsyncConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save configuration to an explicit path, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_to(path: &Path, config: &ReelsyncConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

    Ok(())
}

/// Merge `update` into the saved configuration and write it back.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or written.
pub fn update_config(update: ReelsyncConfig) -> Result<ReelsyncConfig> {
    let path = config_path()?;
    let merged = load_config_from(&path)?.merged(update);
    save_config_to(&path, &merged)?;
    Ok(merged)
}

/// Remove the saved configuration file, if any.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn reset_config() -> Result<bool> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    Ok(true)
}
