//! Reddit API access for snoobot.
//!
//! [`RedditApi`] is the seam the plugin talks to; [`api::RedditClient`] is the
//! HTTP implementation using application-only OAuth against
//! `oauth.reddit.com`.
//!
//! Every call is a live point query. Nothing fetched here is cached.

pub mod api;
pub mod types;

use async_trait::async_trait;

pub use api::{Endpoints, RedditClient};
pub use types::{Comment, Redditor, Submission, Subreddit};

/// Errors returned by [`RedditApi`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The entity does not exist (or was removed).
    #[error("not found")]
    NotFound,
    /// The entity exists but is not accessible (e.g. a private subreddit).
    #[error("forbidden")]
    Forbidden,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response parse failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only lookups against the Reddit content API.
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Fetch a submission by base36 id.
    async fn submission(&self, id: &str) -> Result<Submission, ApiError>;

    /// Fetch a comment by base36 id.
    async fn comment(&self, id: &str) -> Result<Comment, ApiError>;

    /// Fetch subreddit details. Private subreddits yield
    /// [`ApiError::Forbidden`], banned ones [`ApiError::NotFound`].
    async fn subreddit(&self, name: &str) -> Result<Subreddit, ApiError>;

    /// Search subreddit names. With `exact`, a missing name yields
    /// [`ApiError::NotFound`].
    async fn search_subreddit_names(&self, query: &str, exact: bool)
    -> Result<Vec<String>, ApiError>;

    /// Fetch a redditor by name.
    async fn redditor(&self, name: &str) -> Result<Redditor, ApiError>;

    /// Search all subreddits for submissions linking to `url`, newest first,
    /// adult content included.
    async fn search_by_url(&self, url: &str) -> Result<Vec<Submission>, ApiError>;

    /// Resolve a `v.redd.it` video id to the URL of its comment page via the
    /// `Location` header of `www.reddit.com/video/<id>`. `Ok(None)` when the
    /// response carries no redirect.
    async fn video_location(&self, video_id: &str) -> Result<Option<String>, ApiError>;
}
