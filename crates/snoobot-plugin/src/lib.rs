//! snoobot-plugin: Reddit link expansion for chat channels.
//!
//! Recognises Reddit URLs, inline `r/` and `u/` mentions and a handful of
//! commands, looks the content up through a [`RedditApi`] and writes a
//! one-line summary back through a [`ChatHost`].
//!
//! ```text
//! Trigger text
//!     ↓ commands::parse / classify::extract_links / classify::find_mentions
//! ContentRef
//!     ↓ RedditPlugin::dispatch
//! handlers (post, comment, media, subreddit, redditor)
//!     ↓ RedditApi lookups
//! ChatHost::say / reply / kick
//! ```

pub mod cakeday;
pub mod classify;
pub mod commands;
pub mod handlers;
pub mod host;
pub mod style;
pub mod summary;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use snoobot_config::SnooBotConfig;
use snoobot_reddit::{ApiError, RedditApi, RedditClient};
use snoobot_types::{ContentRef, Invocation, Trigger};

pub use host::{ChannelValues, ChatHost, Output};

/// Most URLs expanded from a single message.
const MAX_LINKS_PER_MESSAGE: usize = 5;

/// Plugin behaviour taken from configuration.
#[derive(Debug, Clone)]
pub struct PluginSettings {
    pub slash_info: bool,
    pub command_prefix: String,
    pub help_prefix: String,
    pub time_format: String,
    /// Zone used for channels without their own `timezone` value.
    pub timezone: Tz,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self::from_config(&SnooBotConfig::default())
    }
}

impl PluginSettings {
    pub fn from_config(config: &SnooBotConfig) -> Self {
        Self {
            slash_info: config.reddit.slash_info,
            command_prefix: config.bot.command_prefix.clone(),
            help_prefix: config.bot.help_prefix.clone(),
            time_format: config.bot.time_format.clone(),
            timezone: parse_zone(&config.bot.timezone).unwrap_or_else(|| {
                warn!(timezone = %config.bot.timezone, "Unknown time zone, using UTC");
                Tz::UTC
            }),
        }
    }
}

fn parse_zone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// The Reddit plugin: one shared API handle plus channel settings.
pub struct RedditPlugin {
    api: Arc<dyn RedditApi>,
    channels: Arc<dyn ChannelValues>,
    settings: PluginSettings,
    clock: fn() -> DateTime<Utc>,
}

impl RedditPlugin {
    /// Assemble a plugin from its collaborators.
    pub fn new(
        api: Arc<dyn RedditApi>,
        channels: Arc<dyn ChannelValues>,
        settings: PluginSettings,
    ) -> Self {
        Self {
            api,
            channels,
            settings,
            clock: Utc::now,
        }
    }

    /// Create the shared API client from configuration.
    pub fn setup(config: &SnooBotConfig, channels: Arc<dyn ChannelValues>) -> anyhow::Result<Self> {
        let client = RedditClient::new(&config.reddit.app_id, &config.reddit.user_agent)?;
        info!(app_id = %config.reddit.app_id, "Reddit plugin ready");
        Ok(Self::new(
            Arc::new(client),
            channels,
            PluginSettings::from_config(config),
        ))
    }

    /// Release the shared API client.
    pub fn shutdown(self) {
        info!("Reddit plugin shutting down");
        drop(self.api);
    }

    /// Override the clock used for cake day checks.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle one chat message to completion.
    pub async fn handle_message(&self, host: &dyn ChatHost, trigger: &Trigger) -> anyhow::Result<()> {
        let out = Output::new(host, trigger);

        if let Some(command) = commands::parse(&trigger.text, &self.settings.command_prefix) {
            debug!(command = ?command.kind, nick = %trigger.nick, "Running command");
            return self.run_command(&out, &command).await;
        }

        for url in classify::extract_links(&trigger.text, MAX_LINKS_PER_MESSAGE) {
            if let Some(content) = classify::classify_url(&url) {
                debug!(kind = content.kind(), %url, "Matched Reddit URL");
                self.dispatch(&out, content, Invocation::Auto).await?;
            }
        }

        if self.settings.slash_info {
            for mention in classify::find_mentions(&trigger.text) {
                self.dispatch(&out, mention, Invocation::Mention).await?;
            }
        }

        Ok(())
    }

    /// Route a recognised piece of content to its handler.
    pub async fn dispatch(
        &self,
        out: &Output<'_>,
        content: ContentRef,
        invocation: Invocation,
    ) -> anyhow::Result<()> {
        match content {
            ContentRef::Submission { id } => self.say_post_info(out, &id, true, false).await,
            ContentRef::Comment { id, .. } => self.say_comment_info(out, &id).await,
            ContentRef::Gallery { id } => self.say_post_info(out, &id, false, false).await,
            ContentRef::Image { url, preview, file } => {
                self.image_info(out, &url, preview, &file).await
            }
            ContentRef::Video { url, id } => self.video_info(out, &url, &id).await,
            ContentRef::Subreddit { name } => self.subreddit_info(out, &name, invocation).await,
            ContentRef::User { name } => self.redditor_info(out, &name, invocation).await,
        }
    }

    /// Log an unexpected API failure; explicit commands also get a reply.
    async fn report_failure(
        &self,
        out: &Output<'_>,
        invocation: Invocation,
        what: &str,
        err: &ApiError,
    ) -> anyhow::Result<()> {
        warn!(error = %err, what, "Reddit lookup failed");
        if invocation.explicit() {
            out.reply("Error contacting reddit.").await?;
        }
        Ok(())
    }

    /// Time zone for timestamps shown in `channel`.
    async fn zone(&self, channel: &str) -> Tz {
        match self.channels.timezone(channel).await {
            Ok(Some(name)) => parse_zone(&name).unwrap_or_else(|| {
                debug!(channel, timezone = %name, "Ignoring unknown channel time zone");
                self.settings.timezone
            }),
            Ok(None) => self.settings.timezone,
            Err(e) => {
                warn!(error = %e, channel, "Channel time zone lookup failed");
                self.settings.timezone
            }
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
