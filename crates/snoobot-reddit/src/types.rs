//! Reddit API wire types.

use serde::Deserialize;

/// Author placeholder Reddit uses for removed accounts.
const DELETED: &str = "[deleted]";

/// Generic `{kind, data}` wrapper around every API object.
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

/// A page of things.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub children: Vec<Thing<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

/// A submission (`t3`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    /// Subreddit display name, without the `r/` prefix.
    pub subreddit: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub upvote_ratio: f64,
    #[serde(default)]
    pub num_comments: u64,
}

impl Submission {
    /// Author name, or `None` if the account was deleted.
    pub fn author_name(&self) -> Option<&str> {
        live_author(self.author.as_deref())
    }

    /// Short `redd.it` link to the comment page.
    pub fn shortlink(&self) -> String {
        format!("https://redd.it/{}", self.id)
    }
}

/// A comment (`t1`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    pub created_utc: f64,
    /// Fullname of the parent submission (`t3_...`).
    #[serde(default)]
    pub link_id: String,
}

impl Comment {
    /// Author name, or `None` if the account was deleted.
    pub fn author_name(&self) -> Option<&str> {
        live_author(self.author.as_deref())
    }
}

/// A subreddit (`t5`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subreddit {
    pub display_name: String,
    #[serde(default)]
    pub display_name_prefixed: String,
    /// Relative URL, e.g. `/r/rust/`.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub over18: bool,
    #[serde(default)]
    pub subscribers: Option<u64>,
    pub created_utc: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub subreddit_type: String,
}

/// A redditor (`t2`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Redditor {
    pub name: String,
    /// Missing for suspended accounts.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub is_gold: bool,
    #[serde(default)]
    pub is_employee: bool,
    #[serde(default)]
    pub is_mod: bool,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default)]
    pub is_suspended: bool,
}

/// Response body of `/api/search_reddit_names`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubredditNames {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Response body of `/api/v1/access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

fn live_author(author: Option<&str>) -> Option<&str> {
    author.filter(|name| !name.is_empty() && *name != DELETED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submission_listing() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "after": null,
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "abc123",
                        "title": "Ferris &amp; friends",
                        "subreddit": "rust",
                        "link_flair_text": null,
                        "is_self": false,
                        "url": "https://example.com/",
                        "over_18": false,
                        "spoiler": true,
                        "author": "[deleted]",
                        "created_utc": 1700000000.0,
                        "score": 42,
                        "upvote_ratio": 0.97,
                        "num_comments": 1
                    }
                }]
            }
        }"#;
        let listing: Thing<Listing<Submission>> = serde_json::from_str(json).unwrap();
        let s = &listing.data.children[0].data;
        assert_eq!(s.id, "abc123");
        assert!(s.spoiler);
        assert_eq!(s.author_name(), None);
        assert_eq!(s.shortlink(), "https://redd.it/abc123");
    }

    #[test]
    fn test_parse_suspended_redditor() {
        let json = r#"{"kind": "t2", "data": {"name": "gone", "is_suspended": true}}"#;
        let thing: Thing<Redditor> = serde_json::from_str(json).unwrap();
        assert!(thing.data.is_suspended);
        assert!(thing.data.id.is_none());
    }

    #[test]
    fn test_comment_author() {
        let c = Comment {
            author: Some("spez".into()),
            ..Default::default()
        };
        assert_eq!(c.author_name(), Some("spez"));
    }
}
