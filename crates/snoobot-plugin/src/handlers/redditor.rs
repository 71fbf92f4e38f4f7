//! Redditor summaries.

use snoobot_reddit::ApiError;
use snoobot_types::Invocation;

use crate::RedditPlugin;
use crate::cakeday::is_cakeday;
use crate::host::Output;
use crate::style::{Color, badge};
use crate::summary::Summary;

impl RedditPlugin {
    pub(crate) async fn redditor_info(
        &self,
        out: &Output<'_>,
        name: &str,
        invocation: Invocation,
    ) -> anyhow::Result<()> {
        let user = match self.api.redditor(name).await {
            Ok(user) => user,
            Err(ApiError::NotFound) => {
                if invocation.explicit() {
                    out.reply("No such Redditor.").await?;
                }
                return Ok(());
            }
            Err(e) => return self.report_failure(out, invocation, "redditor", &e).await,
        };

        let line = Summary::new(user.name.clone())
            .when(is_cakeday(user.created_utc, self.now()), || {
                badge("Cake day", Color::LightPurple)
            })
            .when(user.is_gold, || badge("Gold", Color::Yellow))
            .when(user.is_employee, || badge("Employee", Color::Red))
            .when(user.is_mod, || badge("Mod", Color::Green))
            .when(invocation.commanded(), || {
                format!("https://reddit.com/u/{}", user.name)
            })
            .segment(format!("Link: {}", user.link_karma))
            .segment(format!("Comment: {}", user.comment_karma));

        out.say(&line.to_string()).await
    }
}
