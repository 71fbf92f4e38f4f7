//! In-memory collaborators for handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use snoobot_reddit::{ApiError, Comment, RedditApi, Redditor, Submission, Subreddit};
use snoobot_types::ChannelFlag;

use crate::host::{ChannelValues, ChatHost};
use crate::style::{BOLD, COLOR};
use crate::{PluginSettings, RedditPlugin};

/// 2023-11-14T22:13:20Z
pub const NOW: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(NOW, 0).unwrap()
}

/// A plugin over `api` with empty channel settings and a fixed clock.
pub fn plugin(api: MockApi) -> (RedditPlugin, Arc<MemoryChannels>) {
    let channels = Arc::new(MemoryChannels::default());
    let plugin = RedditPlugin::new(Arc::new(api), channels.clone(), PluginSettings::default())
        .with_clock(fixed_now);
    (plugin, channels)
}

/// A plain link submission in r/test.
pub fn submission(id: &str) -> Submission {
    Submission {
        id: id.to_string(),
        title: "Title".into(),
        subreddit: "test".into(),
        url: format!("https://example.com/{id}"),
        author: Some("someone".into()),
        created_utc: NOW as f64,
        upvote_ratio: 0.5,
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MockApi {
    submissions: HashMap<String, Submission>,
    comments: HashMap<String, Comment>,
    subreddits: HashMap<String, Subreddit>,
    redditors: HashMap<String, Redditor>,
    searches: HashMap<String, Vec<Submission>>,
    videos: HashMap<String, String>,
    private: HashSet<String>,
    banned: HashSet<String>,
    failing: bool,
    failing_video: bool,
}

impl MockApi {
    pub fn with_submission(mut self, s: Submission) -> Self {
        self.submissions.insert(s.id.clone(), s);
        self
    }

    pub fn with_comment(mut self, c: Comment) -> Self {
        self.comments.insert(c.id.clone(), c);
        self
    }

    pub fn with_subreddit(mut self, s: Subreddit) -> Self {
        self.subreddits.insert(s.display_name.to_lowercase(), s);
        self
    }

    pub fn with_redditor(mut self, r: Redditor) -> Self {
        self.redditors.insert(r.name.to_lowercase(), r);
        self
    }

    pub fn with_search(mut self, url: &str, results: Vec<Submission>) -> Self {
        self.searches.insert(url.to_string(), results);
        self
    }

    pub fn with_video(mut self, id: &str, location: &str) -> Self {
        self.videos.insert(id.to_string(), location.to_string());
        self
    }

    pub fn with_private_subreddit(mut self, name: &str) -> Self {
        self.private.insert(name.to_lowercase());
        self
    }

    pub fn with_banned_subreddit(mut self, name: &str) -> Self {
        self.banned.insert(name.to_lowercase());
        self
    }

    /// Every call fails with a server error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Only the video redirect lookup fails.
    pub fn failing_video(mut self) -> Self {
        self.failing_video = true;
        self
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing {
            Err(ApiError::Status(500))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RedditApi for MockApi {
    async fn submission(&self, id: &str) -> Result<Submission, ApiError> {
        self.check()?;
        self.submissions.get(id).cloned().ok_or(ApiError::NotFound)
    }

    async fn comment(&self, id: &str) -> Result<Comment, ApiError> {
        self.check()?;
        self.comments.get(id).cloned().ok_or(ApiError::NotFound)
    }

    async fn subreddit(&self, name: &str) -> Result<Subreddit, ApiError> {
        self.check()?;
        let key = name.to_lowercase();
        if self.private.contains(&key) {
            return Err(ApiError::Forbidden);
        }
        if self.banned.contains(&key) {
            return Err(ApiError::NotFound);
        }
        self.subreddits.get(&key).cloned().ok_or(ApiError::NotFound)
    }

    async fn search_subreddit_names(
        &self,
        query: &str,
        exact: bool,
    ) -> Result<Vec<String>, ApiError> {
        self.check()?;
        let key = query.to_lowercase();
        let known = self.subreddits.contains_key(&key)
            || self.private.contains(&key)
            || self.banned.contains(&key);
        match (known, exact) {
            (true, _) => Ok(vec![query.to_string()]),
            (false, true) => Err(ApiError::NotFound),
            (false, false) => Ok(Vec::new()),
        }
    }

    async fn redditor(&self, name: &str) -> Result<Redditor, ApiError> {
        self.check()?;
        self.redditors
            .get(&name.to_lowercase())
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn search_by_url(&self, url: &str) -> Result<Vec<Submission>, ApiError> {
        self.check()?;
        Ok(self.searches.get(url).cloned().unwrap_or_default())
    }

    async fn video_location(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        self.check()?;
        if self.failing_video {
            return Err(ApiError::Status(502));
        }
        Ok(self.videos.get(video_id).cloned())
    }
}

/// Remove bold and colour codes, leaving plain text.
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            BOLD => {}
            COLOR => {
                // Up to two digits of foreground colour
                for _ in 0..2 {
                    if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        chars.next();
                    }
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Say {
        channel: String,
        text: String,
        truncation: Option<String>,
    },
    Reply {
        channel: String,
        nick: String,
        text: String,
    },
    Kick {
        nick: String,
        channel: String,
        reason: String,
    },
}

/// Records everything the plugin sends.
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<Event>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// `say` lines as `<channel> <text>`, formatting codes included.
    pub fn raw_lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Say { channel, text, .. } => Some(format!("{channel} {text}")),
                _ => None,
            })
            .collect()
    }

    /// `say` lines with formatting codes removed.
    pub fn plain_lines(&self) -> Vec<String> {
        self.raw_lines().iter().map(|l| strip(l)).collect()
    }

    pub fn replies(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Kick reasons, in order.
    pub fn kicks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Kick { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ChatHost for RecordingHost {
    async fn say(&self, channel: &str, text: &str, truncation: Option<&str>) -> anyhow::Result<()> {
        self.push(Event::Say {
            channel: channel.to_string(),
            text: text.to_string(),
            truncation: truncation.map(str::to_string),
        });
        Ok(())
    }

    async fn reply(&self, channel: &str, nick: &str, text: &str) -> anyhow::Result<()> {
        self.push(Event::Reply {
            channel: channel.to_string(),
            nick: nick.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn kick(&self, nick: &str, channel: &str, reason: &str) -> anyhow::Result<()> {
        self.push(Event::Kick {
            nick: nick.to_string(),
            channel: channel.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }
}

/// Channel flags held in memory.
#[derive(Default)]
pub struct MemoryChannels {
    flags: Mutex<HashMap<(String, &'static str), bool>>,
    timezones: Mutex<HashMap<String, String>>,
}

impl MemoryChannels {
    pub fn set(&self, flag: ChannelFlag, channel: &str, enabled: bool) {
        self.flags
            .lock()
            .unwrap()
            .insert((channel.to_lowercase(), flag.key()), enabled);
    }

    pub fn set_timezone(&self, channel: &str, zone: &str) {
        self.timezones
            .lock()
            .unwrap()
            .insert(channel.to_lowercase(), zone.to_string());
    }

    pub fn get(&self, flag: ChannelFlag, channel: &str) -> bool {
        self.flags
            .lock()
            .unwrap()
            .get(&(channel.to_lowercase(), flag.key()))
            .copied()
            .unwrap_or(false)
    }
}

#[async_trait]
impl ChannelValues for MemoryChannels {
    async fn get_flag(&self, channel: &str, flag: ChannelFlag) -> anyhow::Result<bool> {
        Ok(self.get(flag, channel))
    }

    async fn set_flag(
        &self,
        channel: &str,
        flag: ChannelFlag,
        enabled: bool,
    ) -> anyhow::Result<()> {
        self.set(flag, channel, enabled);
        Ok(())
    }

    async fn timezone(&self, channel: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .timezones
            .lock()
            .unwrap()
            .get(&channel.to_lowercase())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, badge, color};

    #[test]
    fn test_strip_removes_styling() {
        let styled = format!(
            "title {} | {}",
            badge("[SPOILER]", Color::Grey),
            color("97.0%", Color::Green)
        );
        assert_eq!(strip(&styled), "title [SPOILER] | 97.0%");
    }
}
