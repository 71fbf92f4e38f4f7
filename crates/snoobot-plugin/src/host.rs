//! Interfaces to the host chat runtime.

use async_trait::async_trait;

use snoobot_storage::SnooStorage;
use snoobot_types::{ChannelFlag, Trigger};

/// Prefix added to every line the plugin sends.
pub const OUTPUT_PREFIX: &str = "[reddit] ";

/// Output and moderation calls provided by the host runtime.
///
/// Implementations own formatting details such as line-length truncation
/// and the `nick: ` prefix of replies.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Send a line to a channel. When the line is too long, the host cuts it
    /// and appends `truncation`.
    async fn say(&self, channel: &str, text: &str, truncation: Option<&str>) -> anyhow::Result<()>;

    /// Send a short line addressed to `nick`.
    async fn reply(&self, channel: &str, nick: &str, text: &str) -> anyhow::Result<()>;

    /// Remove `nick` from `channel`.
    async fn kick(&self, nick: &str, channel: &str, reason: &str) -> anyhow::Result<()>;
}

/// Persistent per-channel flags.
#[async_trait]
pub trait ChannelValues: Send + Sync {
    async fn get_flag(&self, channel: &str, flag: ChannelFlag) -> anyhow::Result<bool>;
    async fn set_flag(&self, channel: &str, flag: ChannelFlag, enabled: bool)
    -> anyhow::Result<()>;

    /// The channel's time zone name, if one has been set.
    async fn timezone(&self, channel: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
impl ChannelValues for SnooStorage {
    async fn get_flag(&self, channel: &str, flag: ChannelFlag) -> anyhow::Result<bool> {
        Ok(self.get_channel_flag(channel, flag).await?)
    }

    async fn set_flag(
        &self,
        channel: &str,
        flag: ChannelFlag,
        enabled: bool,
    ) -> anyhow::Result<()> {
        Ok(self.set_channel_flag(channel, flag, enabled).await?)
    }

    async fn timezone(&self, channel: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get_channel_timezone(channel).await?)
    }
}

/// Output bound to the message being handled.
pub struct Output<'a> {
    host: &'a dyn ChatHost,
    trigger: &'a Trigger,
}

impl<'a> Output<'a> {
    pub fn new(host: &'a dyn ChatHost, trigger: &'a Trigger) -> Self {
        Self { host, trigger }
    }

    pub fn trigger(&self) -> &Trigger {
        self.trigger
    }

    /// Where the triggering message was sent.
    pub fn channel(&self) -> &str {
        &self.trigger.channel
    }

    pub async fn say(&self, text: &str) -> anyhow::Result<()> {
        self.host
            .say(&self.trigger.channel, &format!("{OUTPUT_PREFIX}{text}"), None)
            .await
    }

    pub async fn say_truncated(&self, text: &str, truncation: &str) -> anyhow::Result<()> {
        self.host
            .say(
                &self.trigger.channel,
                &format!("{OUTPUT_PREFIX}{text}"),
                Some(truncation),
            )
            .await
    }

    pub async fn reply(&self, text: &str) -> anyhow::Result<()> {
        self.host
            .reply(
                &self.trigger.channel,
                &self.trigger.nick,
                &format!("{OUTPUT_PREFIX}{text}"),
            )
            .await
    }

    /// Kick the sender of the triggering message.
    pub async fn kick_sender(&self, reason: &str) -> anyhow::Result<()> {
        tracing::info!(
            nick = %self.trigger.nick,
            channel = %self.trigger.channel,
            reason,
            "Removing user"
        );
        self.host
            .kick(&self.trigger.nick, &self.trigger.channel, reason)
            .await
    }
}
