//! Subreddit summaries.

use snoobot_reddit::ApiError;
use snoobot_types::{ChannelFlag, Invocation};

use super::{LINK_HIDDEN, NSFW_KICK, TRUNCATION};
use crate::RedditPlugin;
use crate::host::Output;
use crate::style::{Color, badge};
use crate::summary::{Summary, thousands, timestamp};

/// Aggregate feeds with no backing subreddit.
fn special_description(name: &str) -> Option<&'static str> {
    match name {
        "all" => Some("Today's top content from hundreds of thousands of Reddit communities."),
        "popular" => Some("The top trending content from some of Reddit's most popular communities"),
        _ => None,
    }
}

impl RedditPlugin {
    pub(crate) async fn subreddit_info(
        &self,
        out: &Output<'_>,
        name: &str,
        invocation: Invocation,
    ) -> anyhow::Result<()> {
        let lower = name.to_lowercase();
        if let Some(description) = special_description(&lower) {
            let line = Summary::new(format!(
                "r/{lower} {}",
                badge("[Possible NSFW]", Color::Orange)
            ))
            .when(invocation.commanded(), || {
                format!("https://reddit.com/r/{lower}")
            })
            .segment(description);
            return out.say(&line.to_string()).await;
        }

        match self.api.search_subreddit_names(name, true).await {
            Ok(_) => {}
            Err(ApiError::NotFound) => {
                if invocation.explicit() {
                    out.reply("No such subreddit.").await?;
                }
                return Ok(());
            }
            Err(e) => return self.report_failure(out, invocation, "subreddit search", &e).await,
        }

        let sub = match self.api.subreddit(name).await {
            Ok(sub) => sub,
            Err(ApiError::Forbidden) => {
                if invocation.explicit() {
                    out.reply(&format!("r/{name} appears to be a private subreddit!"))
                        .await?;
                }
                return Ok(());
            }
            Err(ApiError::NotFound) => {
                if invocation.explicit() {
                    out.reply(&format!("r/{name} appears to be a banned subreddit!"))
                        .await?;
                }
                return Ok(());
            }
            Err(e) => return self.report_failure(out, invocation, "subreddit", &e).await,
        };

        let mut link = format!("https://reddit.com{}", sub.url);
        let mut nsfw = String::new();
        if sub.over18 {
            nsfw = format!(" {}", badge("[NSFW]", Color::Red));
            if self.channels.get_flag(out.channel(), ChannelFlag::Sfw).await? {
                link = LINK_HIDDEN.to_string();
                out.kick_sender(NSFW_KICK).await?;
            }
        }

        let description = [sub.title.as_str(), sub.public_description.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        let description = if description.is_empty() {
            "(no description)".to_string()
        } else {
            description
        };

        let zone = self.zone(out.channel()).await;
        let line = Summary::new(format!("{}{nsfw}", sub.display_name_prefixed))
            .when(invocation.commanded(), || link)
            .segment(format!(
                "{} subscribers",
                thousands(sub.subscribers.unwrap_or_default())
            ))
            .segment(format!(
                "Created at {}",
                timestamp(sub.created_utc, &self.settings.time_format, zone)
            ))
            .segment(description);

        out.say_truncated(&line.to_string(), TRUNCATION).await
    }
}
