use serde::{Deserialize, Serialize};

// ──────────────────── Content References ────────────────────

/// A piece of Reddit content recognised in a chat message.
///
/// Produced by the URL classifier and consumed once by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRef {
    /// A submission (link or self post), by base36 id.
    Submission { id: String },
    /// A comment inside a submission.
    Comment { submission: String, id: String },
    /// A gallery post, by submission id.
    Gallery { id: String },
    /// A directly hosted image on `i.redd.it` or `preview.redd.it`.
    Image {
        /// The URL as it appeared in the message.
        url: String,
        /// Whether the link went through the `preview` subdomain.
        preview: bool,
        /// Trailing filename, e.g. `yib0zwk1mmza1.png`.
        file: String,
    },
    /// A hosted video on `v.redd.it`.
    Video { url: String, id: String },
    /// A subreddit, by name (without the `r/` prefix).
    Subreddit { name: String },
    /// A redditor, by name (without the `u/` prefix).
    User { name: String },
}

impl ContentRef {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentRef::Submission { .. } => "submission",
            ContentRef::Comment { .. } => "comment",
            ContentRef::Gallery { .. } => "gallery",
            ContentRef::Image { .. } => "image",
            ContentRef::Video { .. } => "video",
            ContentRef::Subreddit { .. } => "subreddit",
            ContentRef::User { .. } => "user",
        }
    }
}

/// How a lookup was triggered. Controls link visibility and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invocation {
    /// A URL posted in passing.
    Auto,
    /// An inline `r/name` or `u/name` mention.
    Mention,
    /// An explicit bot command such as `.subreddit name`.
    Command,
}

impl Invocation {
    /// Whether the output should include a profile/subreddit link.
    pub fn commanded(self) -> bool {
        matches!(self, Invocation::Mention | Invocation::Command)
    }

    /// Whether failures should be reported back to the user.
    pub fn explicit(self) -> bool {
        self == Invocation::Command
    }
}

// ──────────────────── Channel Types ────────────────────

/// Per-channel boolean settings persisted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelFlag {
    /// Channel is safe-for-work; NSFW links get the sender kicked.
    Sfw,
    /// Channel is spoiler-free; spoiler links get the sender kicked.
    SpoilerFree,
}

impl ChannelFlag {
    /// Storage key for this flag.
    pub fn key(self) -> &'static str {
        match self {
            ChannelFlag::Sfw => "sfw",
            ChannelFlag::SpoilerFree => "spoiler_free",
        }
    }
}

/// A chat message delivered to the plugin by the host runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    /// Nick of the sender.
    pub nick: String,
    /// Where the message was sent: a channel name, or the sender's nick
    /// for private messages.
    pub channel: String,
    /// Message text content.
    pub text: String,
    /// Whether the message was sent privately to the bot.
    #[serde(default)]
    pub is_private: bool,
    /// Whether the sender holds operator privileges in `channel`.
    #[serde(default)]
    pub is_op: bool,
}

impl Trigger {
    /// A message sent to a channel.
    pub fn channel_message(
        nick: impl Into<String>,
        channel: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            channel: channel.into(),
            text: text.into(),
            is_private: false,
            is_op: false,
        }
    }

    /// A message sent privately to the bot.
    pub fn private_message(nick: impl Into<String>, text: impl Into<String>) -> Self {
        let nick = nick.into();
        Self {
            channel: nick.clone(),
            nick,
            text: text.into(),
            is_private: true,
            is_op: false,
        }
    }

    /// Mark the sender as a channel operator.
    pub fn with_op(mut self) -> Self {
        self.is_op = true;
        self
    }
}
