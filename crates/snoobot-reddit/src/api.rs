//! Reddit HTTP client.
//!
//! Authenticates with the application-only "installed client" grant, so only
//! a client id is required. The bearer token is the only mutable state and is
//! refreshed shortly before it expires.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, redirect};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::{AccessToken, Listing, Redditor, Submission, Subreddit, SubredditNames, Thing};
use crate::{ApiError, Comment, RedditApi};

const INSTALLED_CLIENT_GRANT: &str = "https://oauth.reddit.com/grants/installed_client";
const DEVICE_ID: &str = "DO_NOT_TRACK_THIS_DEVICE";

/// Refresh the token this long before Reddit says it expires.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// Connect timeout for the raw video redirect lookup.
const VIDEO_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Read timeout for the raw video redirect lookup.
const VIDEO_READ_TIMEOUT: Duration = Duration::from_secs(4);

/// Search result page size.
const SEARCH_LIMIT: &str = "100";

/// Base URLs the client talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Host serving `/api/v1/access_token`.
    pub auth: String,
    /// OAuth API host.
    pub api: String,
    /// Public website host (used for video redirects).
    pub www: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: "https://www.reddit.com".into(),
            api: "https://oauth.reddit.com".into(),
            www: "https://www.reddit.com".into(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            auth: base.clone(),
            api: base.clone(),
            www: base,
        }
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// HTTP client for the Reddit API.
pub struct RedditClient {
    http: Client,
    /// Unauthenticated client for the video redirect lookup.
    raw: Client,
    app_id: String,
    endpoints: Endpoints,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Create a client against the public Reddit endpoints.
    pub fn new(app_id: &str, user_agent: &str) -> Result<Self, ApiError> {
        Self::with_endpoints(app_id, user_agent, Endpoints::default())
    }

    /// Create a client against custom endpoints.
    pub fn with_endpoints(
        app_id: &str,
        user_agent: &str,
        endpoints: Endpoints,
    ) -> Result<Self, ApiError> {
        // Reddit answers unknown subreddits with a redirect to its search
        // page; it must surface as a status, not be followed.
        let http = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;
        let raw = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .connect_timeout(VIDEO_CONNECT_TIMEOUT)
            .read_timeout(VIDEO_READ_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            raw,
            app_id: app_id.to_string(),
            endpoints,
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, fetching a new one if needed.
    async fn access_token(&self) -> Result<String, ApiError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let resp = self
            .http
            .post(format!("{}/api/v1/access_token", self.endpoints.auth))
            .basic_auth(&self.app_id, Some(""))
            .form(&[
                ("grant_type", INSTALLED_CLIENT_GRANT),
                ("device_id", DEVICE_ID),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Auth(format!("token request returned {status}")));
        }
        let token: AccessToken = serde_json::from_str(&resp.text().await?)?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_SLACK);
        debug!(expires_in = token.expires_in, "Obtained Reddit access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// GET an API path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(format!("{}{}", self.endpoints.api, path))
            .bearer_auth(token)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            // Drop the token so the next call re-authenticates.
            self.token.lock().await.take();
        }
        check_status(status)?;
        Ok(serde_json::from_str(&resp.text().await?)?)
    }

    /// Fetch a single thing by fullname through `/api/info`.
    async fn info<T: DeserializeOwned>(&self, fullname: &str) -> Result<T, ApiError> {
        let listing: Thing<Listing<T>> = self.get_json("/api/info", &[("id", fullname)]).await?;
        listing
            .data
            .children
            .into_iter()
            .next()
            .map(|thing| thing.data)
            .ok_or(ApiError::NotFound)
    }
}

/// Map an HTTP status to the error kinds callers distinguish.
fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
        StatusCode::UNAUTHORIZED => Err(ApiError::Auth("access token rejected".into())),
        s if s.is_redirection() => Err(ApiError::NotFound),
        s => Err(ApiError::Status(s.as_u16())),
    }
}

/// Decode a `{kind, data}` object, treating an unexpected kind as missing.
fn expect_kind<T: DeserializeOwned>(
    thing: Thing<serde_json::Value>,
    kind: &str,
) -> Result<T, ApiError> {
    if thing.kind != kind {
        return Err(ApiError::NotFound);
    }
    Ok(serde_json::from_value(thing.data)?)
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[async_trait]
impl RedditApi for RedditClient {
    async fn submission(&self, id: &str) -> Result<Submission, ApiError> {
        self.info(&format!("t3_{id}")).await
    }

    async fn comment(&self, id: &str) -> Result<Comment, ApiError> {
        self.info(&format!("t1_{id}")).await
    }

    async fn subreddit(&self, name: &str) -> Result<Subreddit, ApiError> {
        let thing: Thing<serde_json::Value> = self
            .get_json(&format!("/r/{}/about", encode_segment(name)), &[])
            .await?;
        expect_kind(thing, "t5")
    }

    async fn search_subreddit_names(
        &self,
        query: &str,
        exact: bool,
    ) -> Result<Vec<String>, ApiError> {
        let exact_param = if exact { "true" } else { "false" };
        let names: SubredditNames = self
            .get_json(
                "/api/search_reddit_names",
                &[
                    ("query", query),
                    ("exact", exact_param),
                    ("include_over_18", "true"),
                ],
            )
            .await?;
        if exact && names.names.is_empty() {
            return Err(ApiError::NotFound);
        }
        Ok(names.names)
    }

    async fn redditor(&self, name: &str) -> Result<Redditor, ApiError> {
        let thing: Thing<serde_json::Value> = self
            .get_json(&format!("/user/{}/about", encode_segment(name)), &[])
            .await?;
        let user: Redditor = expect_kind(thing, "t2")?;
        if user.is_suspended || user.id.is_none() {
            return Err(ApiError::NotFound);
        }
        Ok(user)
    }

    async fn search_by_url(&self, url: &str) -> Result<Vec<Submission>, ApiError> {
        let q = format!("url:\"{url}\"");
        let listing: Thing<Listing<Submission>> = self
            .get_json(
                "/r/all/search",
                &[
                    ("q", q.as_str()),
                    ("sort", "new"),
                    ("restrict_sr", "on"),
                    ("include_over_18", "on"),
                    ("limit", SEARCH_LIMIT),
                ],
            )
            .await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .collect())
    }

    async fn video_location(&self, video_id: &str) -> Result<Option<String>, ApiError> {
        let resp = self
            .raw
            .head(format!(
                "{}/video/{}",
                self.endpoints.www,
                encode_segment(video_id)
            ))
            .send()
            .await?;

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|loc| {
                if loc.starts_with('/') {
                    format!("{}{}", self.endpoints.www, loc)
                } else {
                    loc.to_string()
                }
            });
        debug!(video_id, status = %resp.status(), ?location, "Video redirect lookup");
        Ok(location)
    }
}
