use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use snoobot_plugin::{ChatHost, RedditPlugin};
use snoobot_storage::SnooStorage;
use snoobot_types::Trigger;

/// Where console messages appear to come from.
pub struct Session {
    pub channel: String,
    pub nick: String,
    pub op: bool,
    pub private: bool,
}

impl Session {
    fn trigger(&self, text: &str) -> Trigger {
        let trigger = if self.private {
            Trigger::private_message(&self.nick, text)
        } else {
            Trigger::channel_message(&self.nick, &self.channel, text)
        };
        if self.op { trigger.with_op() } else { trigger }
    }
}

/// A chat host that prints to stdout.
pub struct ConsoleHost {
    max_message_length: usize,
}

impl ConsoleHost {
    pub fn new(max_message_length: usize) -> Self {
        Self { max_message_length }
    }

    fn print(&self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Cut `text` to at most `max` bytes on a char boundary, appending `marker`
/// when anything was removed.
pub fn truncate(text: &str, max: usize, marker: Option<&str>) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    // A marker that does not fit is dropped
    let marker = marker.filter(|m| m.len() <= max).unwrap_or("");
    let mut end = max - marker.len();
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{marker}", &text[..end])
}

#[async_trait]
impl ChatHost for ConsoleHost {
    async fn say(&self, channel: &str, text: &str, truncation: Option<&str>) -> Result<()> {
        self.print(&format!(
            "{channel} {}",
            truncate(text, self.max_message_length, truncation)
        ))
    }

    async fn reply(&self, channel: &str, nick: &str, text: &str) -> Result<()> {
        let text = format!("{nick}: {text}");
        self.print(&format!(
            "{channel} {}",
            truncate(&text, self.max_message_length, None)
        ))
    }

    async fn kick(&self, nick: &str, channel: &str, reason: &str) -> Result<()> {
        self.print(&format!("*** {nick} was kicked from {channel} ({reason})"))
    }
}

/// Feed stdin lines to the plugin until EOF.
pub async fn run_console(session: Session) -> Result<()> {
    let config = snoobot_config::load_config().unwrap_or_default();
    snoobot_config::ensure_config_dir()?;
    let db_path = config.database_path()?;
    let storage = SnooStorage::open(&db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let plugin = RedditPlugin::setup(&config, Arc::new(storage))?;
    let host = ConsoleHost::new(config.bot.max_message_length);

    tracing::info!(
        channel = %session.channel,
        nick = %session.nick,
        db = %db_path.display(),
        "Console session started"
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = stdin.lock().read_line(&mut line)?;
        if bytes == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let trigger = session.trigger(input);
        if let Err(e) = plugin.handle_message(&host, &trigger).await {
            tracing::error!(error = %e, "Message handling failed");
        }
    }

    plugin.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("hello", 10, Some(" […]")), "hello");
        assert_eq!(truncate("hello", 5, None), "hello");
    }

    #[test]
    fn test_truncate_with_marker() {
        let out = truncate("abcdefghijklmnop", 12, Some(" […]"));
        // " […]" is six bytes
        assert_eq!(out, "abcdef […]");
        assert!(out.len() <= 12);
    }

    #[test]
    fn test_truncate_without_marker() {
        assert_eq!(truncate("abcdefgh", 4, None), "abcd");
    }

    #[test]
    fn test_truncate_limit_below_marker_length() {
        let out = truncate("abcdefgh", 3, Some(" […]"));
        assert_eq!(out, "abc");
        assert!(out.len() <= 3);
        assert_eq!(truncate("abcdefgh", 0, Some(" […]")), "");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate("aébc", 2, None), "a");
    }

    #[test]
    fn test_session_trigger() {
        let session = Session {
            channel: "#snoo".into(),
            nick: "alice".into(),
            op: true,
            private: false,
        };
        let t = session.trigger(".setsfw");
        assert_eq!(t.channel, "#snoo");
        assert!(t.is_op);
        assert!(!t.is_private);

        let private = Session {
            private: true,
            op: false,
            ..session
        };
        let t = private.trigger("hi");
        assert_eq!(t.channel, "alice");
        assert!(t.is_private);
        assert!(!t.is_op);
    }
}
