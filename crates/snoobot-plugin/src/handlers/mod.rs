//! Per-entity renderers.
//!
//! Each handler performs its lookups, applies channel gating and writes at
//! most one summary line.

mod media;
mod post;
mod redditor;
mod subreddit;

pub use media::direct_image_url;
pub use post::link_text;

/// Replaces a link that must not be shown in the channel.
const LINK_HIDDEN: &str = "(link hidden)";

/// Author shown for deleted accounts.
const DELETED: &str = "[deleted]";

/// Marker appended by the host when a long line is cut.
const TRUNCATION: &str = " […]";

const NSFW_KICK: &str = "Linking to NSFW content in a SFW channel.";
const SPOILER_KICK: &str = "Linking to spoiler content in a spoiler-free channel.";
