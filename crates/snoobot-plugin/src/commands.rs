//! Chat commands.
//!
//! `subreddit` and `redditor` look things up on demand; the `set*`/`get*`
//! pairs manage the per-channel SFW and spoiler-free flags.

use tracing::info;

use snoobot_types::{ChannelFlag, Invocation};

use crate::RedditPlugin;
use crate::host::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Subreddit,
    Redditor,
    SetSfw,
    GetSfw,
    SetSpoilerFree,
    GetSpoilerFree,
}

/// Command names and aliases.
const COMMANDS: &[(&str, CommandKind)] = &[
    ("subreddit", CommandKind::Subreddit),
    ("redditor", CommandKind::Redditor),
    ("setsfw", CommandKind::SetSfw),
    ("setsafeforwork", CommandKind::SetSfw),
    ("getsfw", CommandKind::GetSfw),
    ("getsafeforwork", CommandKind::GetSfw),
    ("setspoilfree", CommandKind::SetSpoilerFree),
    ("setspoilerfree", CommandKind::SetSpoilerFree),
    ("getspoilfree", CommandKind::GetSpoilerFree),
    ("getspoilerfree", CommandKind::GetSpoilerFree),
];

impl CommandKind {
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, kind)| *kind)
    }

    /// The channel flag a `set*`/`get*` command manages.
    fn flag(self) -> Option<ChannelFlag> {
        match self {
            CommandKind::SetSfw | CommandKind::GetSfw => Some(ChannelFlag::Sfw),
            CommandKind::SetSpoilerFree | CommandKind::GetSpoilerFree => {
                Some(ChannelFlag::SpoilerFree)
            }
            CommandKind::Subreddit | CommandKind::Redditor => None,
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl Command {
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Parse `text` as a command introduced by `prefix`.
///
/// Returns `None` for ordinary messages and unknown command names.
pub fn parse(text: &str, prefix: &str) -> Option<Command> {
    let rest = text.strip_prefix(prefix)?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut words = rest.split_whitespace();
    let kind = CommandKind::from_name(&words.next()?.to_lowercase())?;
    Some(Command {
        kind,
        args: words.map(str::to_string).collect(),
    })
}

/// How a channel flag is described in replies.
fn flag_state(flag: ChannelFlag, enabled: bool) -> &'static str {
    match (flag, enabled) {
        (ChannelFlag::Sfw, true) => "SFW",
        (ChannelFlag::Sfw, false) => "NSFW",
        (ChannelFlag::SpoilerFree, true) => "spoiler-free",
        (ChannelFlag::SpoilerFree, false) => "spoilers-allowed",
    }
}

impl RedditPlugin {
    pub(crate) async fn run_command(&self, out: &Output<'_>, cmd: &Command) -> anyhow::Result<()> {
        match cmd.kind {
            CommandKind::Subreddit => match cmd.first_arg() {
                Some(name) => self.subreddit_info(out, name, Invocation::Command).await,
                None => out.reply("You must provide a subreddit name.").await,
            },
            CommandKind::Redditor => match cmd.first_arg() {
                Some(name) => self.redditor_info(out, name, Invocation::Command).await,
                None => out.reply("You must provide a Redditor name.").await,
            },
            CommandKind::SetSfw | CommandKind::SetSpoilerFree => self.set_channel_flag(out, cmd).await,
            CommandKind::GetSfw | CommandKind::GetSpoilerFree => self.get_channel_flag(out, cmd).await,
        }
    }

    async fn set_channel_flag(&self, out: &Output<'_>, cmd: &Command) -> anyhow::Result<()> {
        let Some(flag) = cmd.kind.flag() else {
            return Ok(());
        };
        let trigger = out.trigger();

        if trigger.is_private {
            let message = match flag {
                ChannelFlag::Sfw => "Setting SFW status is only supported in a channel.",
                ChannelFlag::SpoilerFree => "Only channels can be marked as spoiler-free.",
            };
            return out.reply(message).await;
        }
        if !trigger.is_op {
            return out
                .reply("You must be a channel operator to use this command.")
                .await;
        }

        let param = cmd.first_arg().unwrap_or("true").trim().to_lowercase();
        let enabled = param == "true";
        self.channels
            .set_flag(&trigger.channel, flag, enabled)
            .await?;
        info!(
            channel = %trigger.channel,
            flag = flag.key(),
            enabled,
            nick = %trigger.nick,
            "Channel flag updated"
        );

        let state = flag_state(flag, enabled);
        out.say(&format!("{} is now flagged as {state}.", trigger.channel))
            .await
    }

    async fn get_channel_flag(&self, out: &Output<'_>, cmd: &Command) -> anyhow::Result<()> {
        let Some(flag) = cmd.kind.flag() else {
            return Ok(());
        };
        let trigger = out.trigger();

        let channel = match cmd.first_arg() {
            Some(channel) => channel.to_string(),
            None if trigger.is_private => {
                let name = match flag {
                    ChannelFlag::Sfw => "getsfw",
                    ChannelFlag::SpoilerFree => "getspoilfree",
                };
                return out
                    .reply(&format!(
                        "{}{name} with no channel param is only permitted in channels.",
                        self.settings.help_prefix
                    ))
                    .await;
            }
            None => trigger.channel.clone(),
        };

        let enabled = self.channels.get_flag(&channel, flag).await?;
        let state = flag_state(flag, enabled);
        out.say(&format!("{channel} is flagged as {state}")).await
    }
}
