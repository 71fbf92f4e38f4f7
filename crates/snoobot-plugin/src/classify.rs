//! URL classification.
//!
//! A fixed table of patterns maps Reddit URL shapes to [`ContentRef`]s. The
//! patterns are disjoint on path shape, so at most one rule fires for any URL.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use snoobot_types::ContentRef;

/// Scheme plus optional subdomain of the main site.
const DOMAIN: &str = r"https?://(?:www\.|old\.|new\.|beta\.|pay\.|ssl\.|[a-z]{2}\.)?reddit\.com";

static SUBREDDIT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{DOMAIN}/r/(?P<subreddit>[\w-]+)/?$")).unwrap());

static POST_OR_COMMENT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{DOMAIN}(?:/r/\S+?)?/comments/(?P<submission>[\w-]+)(?:/?(?:[\w%]+/(?P<comment>[\w-]+))?)"
    ))
    .unwrap()
});

static SHORT_POST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:redd\.it|reddit\.com)/(?P<submission>[\w-]+)/?$").unwrap()
});

static USER_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{DOMAIN}/u(?:ser)?/(?P<user>[\w-]+)")).unwrap());

static IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?P<subdomain>i|preview)\.redd\.it/(?:[\w%]+-)*(?P<image>[^\-?\s]+)")
        .unwrap()
});

static VIDEO_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://v\.redd\.it/(?P<video>[\w-]+)").unwrap());

static GALLERY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:www\.)?reddit\.com/gallery/(?P<gallery>[\w-]+)").unwrap()
});

/// Inline `r/name` / `u/name` mentions in free text.
static SLASH_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)/?(?P<prefix>[rRuU])/(?P<name>[a-zA-Z0-9_-]+)\b").unwrap()
});

/// Candidate URLs inside a chat message.
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s<>]+").unwrap());

/// Which handler a URL is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Subreddit,
    /// Full submission/comment URLs and `redd.it` short links.
    PostOrComment,
    User,
    Image,
    Video,
    Gallery,
}

/// A pattern bound to the handler it triggers.
pub struct UrlRule {
    pub kind: RuleKind,
    pub pattern: &'static Lazy<Regex>,
    extract: fn(&Captures<'_>) -> Option<ContentRef>,
}

impl UrlRule {
    /// Apply this rule to a URL.
    pub fn apply(&self, url: &str) -> Option<ContentRef> {
        self.pattern.captures(url).and_then(|caps| (self.extract)(&caps))
    }
}

static RULES: [UrlRule; 7] = [
    UrlRule {
        kind: RuleKind::Subreddit,
        pattern: &SUBREDDIT_URL,
        extract: extract_subreddit,
    },
    UrlRule {
        kind: RuleKind::PostOrComment,
        pattern: &POST_OR_COMMENT_URL,
        extract: extract_post_or_comment,
    },
    UrlRule {
        kind: RuleKind::PostOrComment,
        pattern: &SHORT_POST_URL,
        extract: extract_post_or_comment,
    },
    UrlRule {
        kind: RuleKind::User,
        pattern: &USER_URL,
        extract: extract_user,
    },
    UrlRule {
        kind: RuleKind::Image,
        pattern: &IMAGE_URL,
        extract: extract_image,
    },
    UrlRule {
        kind: RuleKind::Video,
        pattern: &VIDEO_URL,
        extract: extract_video,
    },
    UrlRule {
        kind: RuleKind::Gallery,
        pattern: &GALLERY_URL,
        extract: extract_gallery,
    },
];

/// Classify a single URL.
pub fn classify_url(url: &str) -> Option<ContentRef> {
    RULES.iter().find_map(|rule| rule.apply(url))
}

/// Every rule that matches `url`. Used to check that rules stay disjoint.
pub fn matching_rules(url: &str) -> Vec<RuleKind> {
    RULES
        .iter()
        .filter(|rule| rule.pattern.is_match(url))
        .map(|rule| rule.kind)
        .collect()
}

/// Extract the submission id from a full post URL, e.g. a video redirect target.
pub fn submission_id(url: &str) -> Option<String> {
    POST_OR_COMMENT_URL
        .captures(url)
        .and_then(|caps| caps.name("submission"))
        .map(|m| m.as_str().to_string())
}

/// Extract URLs from text, in order, without duplicates.
pub fn extract_links(text: &str, max_links: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for found in LINK.find_iter(text) {
        let url = clean_link(found.as_str());
        if !links.iter().any(|l| l == url) {
            links.push(url.to_string());
        }
        if links.len() >= max_links {
            break;
        }
    }
    links
}

/// Strip sentence punctuation, quotes and unbalanced closing brackets from
/// the end of a link.
fn clean_link(mut url: &str) -> &str {
    loop {
        let trimmed = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '"', '\'']);
        let unbalanced = match trimmed.chars().last() {
            Some(')') => trimmed.matches('(').count() < trimmed.matches(')').count(),
            Some(']') => trimmed.matches('[').count() < trimmed.matches(']').count(),
            _ => false,
        };
        let next = if unbalanced {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if next.len() == url.len() {
            return url;
        }
        url = next;
    }
}

/// Find inline `r/name` and `u/name` mentions.
pub fn find_mentions(text: &str) -> Vec<ContentRef> {
    SLASH_MENTION
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str().to_string();
            match caps.name("prefix")?.as_str() {
                "r" | "R" => Some(ContentRef::Subreddit { name }),
                _ => Some(ContentRef::User { name }),
            }
        })
        .collect()
}

fn extract_subreddit(caps: &Captures<'_>) -> Option<ContentRef> {
    Some(ContentRef::Subreddit {
        name: caps.name("subreddit")?.as_str().to_string(),
    })
}

fn extract_post_or_comment(caps: &Captures<'_>) -> Option<ContentRef> {
    let submission = caps.name("submission")?.as_str().to_string();
    match caps.name("comment").filter(|m| !m.as_str().is_empty()) {
        Some(comment) => Some(ContentRef::Comment {
            submission,
            id: comment.as_str().to_string(),
        }),
        None => Some(ContentRef::Submission { id: submission }),
    }
}

fn extract_user(caps: &Captures<'_>) -> Option<ContentRef> {
    Some(ContentRef::User {
        name: caps.name("user")?.as_str().to_string(),
    })
}

fn extract_image(caps: &Captures<'_>) -> Option<ContentRef> {
    Some(ContentRef::Image {
        url: caps.get(0)?.as_str().to_string(),
        preview: caps.name("subdomain")?.as_str() == "preview",
        file: caps.name("image")?.as_str().to_string(),
    })
}

fn extract_video(caps: &Captures<'_>) -> Option<ContentRef> {
    Some(ContentRef::Video {
        url: caps.get(0)?.as_str().to_string(),
        id: caps.name("video")?.as_str().to_string(),
    })
}

fn extract_gallery(caps: &Captures<'_>) -> Option<ContentRef> {
    Some(ContentRef::Gallery {
        id: caps.name("gallery")?.as_str().to_string(),
    })
}
