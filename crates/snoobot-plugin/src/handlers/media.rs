//! Reverse lookups for hosted images and videos.

use tracing::{debug, warn};

use crate::RedditPlugin;
use crate::classify;
use crate::host::Output;

/// The canonical `i.redd.it` address for an image link.
///
/// Preview links carry resizing query parameters, so they are rewritten to
/// the bare file.
pub fn direct_image_url(url: &str, preview: bool, file: &str) -> String {
    if preview {
        format!("https://i.redd.it/{file}")
    } else {
        url.to_string()
    }
}

impl RedditPlugin {
    /// Id of the oldest submission linking to `url`, if any.
    async fn oldest_linking(&self, url: &str) -> Option<String> {
        match self.api.search_by_url(url).await {
            Ok(results) => results.last().map(|s| s.id.clone()),
            Err(e) => {
                warn!(error = %e, %url, "URL search failed");
                None
            }
        }
    }

    pub(crate) async fn image_info(
        &self,
        out: &Output<'_>,
        url: &str,
        preview: bool,
        file: &str,
    ) -> anyhow::Result<()> {
        let url = direct_image_url(url, preview, file);
        let Some(id) = self.oldest_linking(&url).await else {
            debug!(%url, "No submission links this image");
            return Ok(());
        };
        self.say_post_info(out, &id, preview, true).await
    }

    pub(crate) async fn video_info(
        &self,
        out: &Output<'_>,
        url: &str,
        video_id: &str,
    ) -> anyhow::Result<()> {
        let from_redirect = match self.api.video_location(video_id).await {
            Ok(Some(location)) => classify::submission_id(&location),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, video_id, "Video redirect lookup failed");
                None
            }
        };

        let id = match from_redirect {
            Some(id) => id,
            None => match self.oldest_linking(url).await {
                Some(id) => id,
                None => {
                    debug!(%url, "No submission links this video");
                    return Ok(());
                }
            },
        };
        self.say_post_info(out, &id, false, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, RecordingHost, plugin, submission};
    use snoobot_types::Trigger;

    #[test]
    fn test_direct_image_url() {
        assert_eq!(
            direct_image_url("https://preview.redd.it/abc.png?width=640", true, "abc.png"),
            "https://i.redd.it/abc.png"
        );
        assert_eq!(
            direct_image_url("https://i.redd.it/abc.png", false, "abc.png"),
            "https://i.redd.it/abc.png"
        );
    }

    #[tokio::test]
    async fn test_image_uses_oldest_submission() {
        let mut newest = submission("new1");
        newest.title = "Repost".into();
        let mut oldest = submission("old1");
        oldest.title = "Original".into();
        let api = MockApi::default()
            .with_search("https://i.redd.it/abc.png", vec![newest, oldest.clone()])
            .with_submission(oldest);
        let (plugin, _) = plugin(api);
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .image_info(
                &Output::new(&host, &trigger),
                "https://preview.redd.it/abc.png?width=640",
                true,
                "abc.png",
            )
            .await
            .unwrap();

        let line = &host.plain_lines()[0];
        assert!(line.starts_with("#rust [reddit] Original "));
        assert!(line.ends_with(" | https://redd.it/old1"));
    }

    #[tokio::test]
    async fn test_unlinked_image_is_silent() {
        let (plugin, _) = plugin(MockApi::default());
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .image_info(
                &Output::new(&host, &trigger),
                "https://i.redd.it/none.jpg",
                false,
                "none.jpg",
            )
            .await
            .unwrap();

        assert!(host.events().is_empty());
    }

    #[tokio::test]
    async fn test_video_follows_redirect() {
        let api = MockApi::default()
            .with_video(
                "vid1",
                "https://www.reddit.com/r/rust/comments/p0st1d/a_video/",
            )
            .with_submission(submission("p0st1d"));
        let (plugin, _) = plugin(api);
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .video_info(&Output::new(&host, &trigger), "https://v.redd.it/vid1", "vid1")
            .await
            .unwrap();

        let line = &host.plain_lines()[0];
        assert!(line.contains(" to r/test |"));
        assert!(line.ends_with(" | https://redd.it/p0st1d"));
    }

    #[tokio::test]
    async fn test_video_falls_back_to_search() {
        let api = MockApi::default()
            .with_video("vid2", "https://www.reddit.com/")
            .with_search("https://v.redd.it/vid2", vec![submission("s3arch")])
            .with_submission(submission("s3arch"));
        let (plugin, _) = plugin(api);
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .video_info(&Output::new(&host, &trigger), "https://v.redd.it/vid2", "vid2")
            .await
            .unwrap();

        assert!(host.plain_lines()[0].ends_with(" | https://redd.it/s3arch"));
    }

    #[tokio::test]
    async fn test_video_lookup_error_falls_back_to_search() {
        let api = MockApi::default()
            .failing_video()
            .with_video("vid3", "https://www.reddit.com/r/rust/comments/unused/x/")
            .with_search("https://v.redd.it/vid3", vec![submission("f4llbk")])
            .with_submission(submission("f4llbk"));
        let (plugin, _) = plugin(api);
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .video_info(&Output::new(&host, &trigger), "https://v.redd.it/vid3", "vid3")
            .await
            .unwrap();

        let lines = host.plain_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" | https://redd.it/f4llbk"));
    }

    #[tokio::test]
    async fn test_unknown_video_is_silent() {
        let (plugin, _) = plugin(MockApi::default());
        let host = RecordingHost::default();
        let trigger = Trigger::channel_message("bob", "#rust", "");

        plugin
            .video_info(&Output::new(&host, &trigger), "https://v.redd.it/zzz", "zzz")
            .await
            .unwrap();

        assert!(host.events().is_empty());
    }
}
