//! snoobot-storage: SQLite-based persistence for per-channel settings.
//!
//! Values are stored as JSON text keyed by `(channel, key)`. Channel names are
//! lowercased before use, so `#Rust` and `#rust` share settings.

use std::path::Path;
use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension};
use tokio::sync::Mutex;

use snoobot_types::ChannelFlag;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Blocking task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Channel value holding an IANA time zone name such as `Europe/Berlin`.
pub const TIMEZONE_KEY: &str = "timezone";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS channel_values (
        channel TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL,
        PRIMARY KEY (channel, key)
    );";

/// SQLite-based key-value store for channel settings.
#[derive(Clone)]
pub struct SnooStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SnooStorage {
    /// Open (or create) the SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::info!("Storage opened: {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get a raw channel value.
    pub async fn get_channel_value(
        &self,
        channel: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>> {
        let conn = self.conn.clone();
        let channel = channel.to_lowercase();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let raw: Option<String> = conn
                .query_row(
                    "SELECT value FROM channel_values WHERE channel = ?1 AND key = ?2",
                    rusqlite::params![channel, key],
                    |row| row.get(0),
                )
                .optional()?;
            match raw {
                Some(text) => Ok(Some(serde_json::from_str(&text)?)),
                None => Ok(None),
            }
        })
        .await?
    }

    /// Set (insert or replace) a channel value.
    pub async fn set_channel_value(
        &self,
        channel: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let conn = self.conn.clone();
        let channel = channel.to_lowercase();
        let key = key.to_string();
        let text = serde_json::to_string(&value)?;
        let now = chrono::Utc::now().timestamp_millis();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO channel_values (channel, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(channel, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![channel, key, text, now],
            )?;
            Ok(())
        })
        .await?
    }

    // ─── Channel Flags ───────────────────────────────────

    /// The channel's IANA time zone name, if one is stored.
    pub async fn get_channel_timezone(&self, channel: &str) -> Result<Option<String>> {
        let value = self.get_channel_value(channel, TIMEZONE_KEY).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Read a boolean channel flag. Unset or non-boolean values read as `false`.
    pub async fn get_channel_flag(&self, channel: &str, flag: ChannelFlag) -> Result<bool> {
        let value = self.get_channel_value(channel, flag.key()).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    /// Persist a boolean channel flag.
    pub async fn set_channel_flag(
        &self,
        channel: &str,
        flag: ChannelFlag,
        enabled: bool,
    ) -> Result<()> {
        self.set_channel_value(channel, flag.key(), serde_json::Value::Bool(enabled))
            .await
    }
}
