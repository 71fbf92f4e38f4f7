use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides `reddit.app_id`.
pub const APP_ID_ENV: &str = "REDDIT_APP_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config directory not found")]
    NoDirFound,
}

/// Reddit plugin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// Expand inline references like `u/someone` or `r/subname` in chat.
    #[serde(default = "default_true")]
    pub slash_info: bool,
    /// Client ID of the Reddit application used for API access.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// User-Agent sent with every API request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_true() -> bool {
    true
}

fn default_app_id() -> String {
    "6EiphT6SSQq7FQ".to_string()
}

fn default_user_agent() -> String {
    format!("snoobot/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            slash_info: true,
            app_id: default_app_id(),
            user_agent: default_user_agent(),
        }
    }
}

/// Host-side settings: command parsing, output and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Prefix that marks a message as a command.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Prefix shown when referring to commands in help text.
    #[serde(default = "default_prefix")]
    pub help_prefix: String,
    /// `strftime`-style format for creation timestamps.
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// Default IANA time zone for timestamps, e.g. `Europe/Berlin`. A
    /// channel's own `timezone` value takes precedence.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Maximum length of a single output line, in bytes.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// SQLite database path (defaults to `~/.snoobot/snoobot.db`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

fn default_prefix() -> String {
    ".".to_string()
}

fn default_time_format() -> String {
    "%Y-%m-%d - %H:%M:%S%Z".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_max_message_length() -> usize {
    400
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            help_prefix: default_prefix(),
            time_format: default_time_format(),
            timezone: default_timezone(),
            max_message_length: default_max_message_length(),
            database: None,
        }
    }
}

/// Top-level snoobot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnooBotConfig {
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

impl SnooBotConfig {
    /// Resolve the database path, falling back to the config directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.bot.database {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join("snoobot.db")),
        }
    }

    /// Apply environment overrides on top of file values.
    fn apply_env(&mut self, app_id: Option<String>) {
        if let Some(app_id) = app_id.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Using app id from {APP_ID_ENV}");
            self.reddit.app_id = app_id;
        }
    }
}

/// Resolve the snoobot config directory (~/.snoobot/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".snoobot"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path (~/.snoobot/config.json5).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json5"))
}

/// Load configuration from the default path, falling back to defaults.
pub fn load_config() -> Result<SnooBotConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;
    config.apply_env(std::env::var(APP_ID_ENV).ok());
    Ok(config)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<SnooBotConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(SnooBotConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: SnooBotConfig = json5::from_str(&content)?;
    Ok(config)
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
