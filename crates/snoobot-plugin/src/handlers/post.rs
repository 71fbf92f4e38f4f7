//! Submission and comment summaries.

use snoobot_reddit::{ApiError, Submission};
use snoobot_types::{ChannelFlag, Invocation};

use super::{DELETED, LINK_HIDDEN, NSFW_KICK, SPOILER_KICK, TRUNCATION};
use crate::host::Output;
use crate::style::{Color, badge};
use crate::summary::{Summary, comment_text, count, ratio, timestamp};
use crate::RedditPlugin;

/// How the submission's target is shown after the title.
pub fn link_text(s: &Submission, show_link: bool) -> String {
    if !show_link {
        format!("to r/{}", s.subreddit)
    } else if s.is_self {
        format!("(self.{})", s.subreddit)
    } else {
        format!("({}) to r/{}", s.url, s.subreddit)
    }
}

impl RedditPlugin {
    pub(crate) async fn say_post_info(
        &self,
        out: &Output<'_>,
        id: &str,
        show_link: bool,
        show_comments_link: bool,
    ) -> anyhow::Result<()> {
        let s = match self.api.submission(id).await {
            Ok(s) => s,
            Err(ApiError::NotFound) => return out.reply("No such post.").await,
            Err(e) => return self.report_failure(out, Invocation::Auto, "submission", &e).await,
        };

        let mut link = link_text(&s, show_link);
        let mut badges = String::new();

        if s.over_18 {
            badges.push(' ');
            badges.push_str(&badge("[NSFW]", Color::Red));
            if self.channels.get_flag(out.channel(), ChannelFlag::Sfw).await? {
                link = LINK_HIDDEN.to_string();
                out.kick_sender(NSFW_KICK).await?;
            }
        }
        if s.spoiler {
            badges.push(' ');
            badges.push_str(&badge("[SPOILER]", Color::Grey));
            if self
                .channels
                .get_flag(out.channel(), ChannelFlag::SpoilerFree)
                .await?
            {
                link = LINK_HIDDEN.to_string();
                out.kick_sender(SPOILER_KICK).await?;
            }
        }

        let flair = s
            .link_flair_text
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| format!(" ('{f}' flair)"))
            .unwrap_or_default();
        let title = html_escape::decode_html_entities(&s.title);
        let zone = self.zone(out.channel()).await;

        let line = Summary::new(format!("{title}{flair} {link}{badges}"))
            .segment(format!(
                "{} ({})",
                count(s.score, "point", "points"),
                ratio(s.upvote_ratio, s.score)
            ))
            .segment(count(s.num_comments as i64, "comment", "comments"))
            .segment(format!("Posted by {}", s.author_name().unwrap_or(DELETED)))
            .segment(format!(
                "Created at {}",
                timestamp(s.created_utc, &self.settings.time_format, zone)
            ))
            .when(show_comments_link, || s.shortlink());

        out.say(&line.to_string()).await
    }

    pub(crate) async fn say_comment_info(&self, out: &Output<'_>, id: &str) -> anyhow::Result<()> {
        let c = match self.api.comment(id).await {
            Ok(c) => c,
            Err(ApiError::NotFound) => return out.reply("No such comment.").await,
            Err(e) => return self.report_failure(out, Invocation::Auto, "comment", &e).await,
        };

        let zone = self.zone(out.channel()).await;
        let line = Summary::new(format!(
            "Comment by {}",
            c.author_name().unwrap_or(DELETED)
        ))
        .segment(count(c.score, "point", "points"))
        .segment(format!(
            "Posted at {}",
            timestamp(c.created_utc, &self.settings.time_format, zone)
        ))
        .segment(comment_text(&c.body));

        out.say_truncated(&line.to_string(), TRUNCATION).await
    }
}
