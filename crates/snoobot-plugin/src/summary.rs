//! Building blocks for one-line summaries.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::style::{Color, color};

const SEPARATOR: &str = " | ";

/// An ordered list of output segments joined with ` | `.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    segments: Vec<String>,
}

impl Summary {
    /// Start a summary with its leading segment.
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            segments: vec![head.into()],
        }
    }

    /// Append a segment.
    pub fn segment(mut self, text: impl Into<String>) -> Self {
        self.segments.push(text.into());
        self
    }

    /// Append a segment when `cond` holds.
    pub fn when(self, cond: bool, text: impl FnOnce() -> String) -> Self {
        if cond { self.segment(text()) } else { self }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

/// `1 point`, `2 points`, `0 points`, `-1 points`.
pub fn count(n: i64, singular: &str, plural: &str) -> String {
    let unit = if n == 1 { singular } else { plural };
    format!("{n} {unit}")
}

/// Upvote ratio as a percentage with one decimal, coloured by score sign.
pub fn ratio(upvote_ratio: f64, score: i64) -> String {
    let fg = if score > 0 { Color::Green } else { Color::Red };
    color(&format!("{:.1}%", upvote_ratio * 100.0), fg)
}

/// Group digits in thousands: `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Convert a fractional epoch timestamp, keeping sub-second precision.
pub fn from_epoch(created_utc: f64) -> Option<DateTime<Utc>> {
    let secs = created_utc.floor();
    let nanos = (((created_utc - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Format an epoch timestamp in `zone` with a `strftime` pattern.
///
/// Falls back to RFC 3339 when the pattern is invalid.
pub fn timestamp(created_utc: f64, format: &str, zone: Tz) -> String {
    let Some(dt) = from_epoch(created_utc) else {
        return created_utc.to_string();
    };
    let local = dt.with_timezone(&zone);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return local.to_rfc3339();
    }
    out
}

/// Non-empty comment lines that are not quotes, joined by spaces.
pub fn comment_text(body: &str) -> String {
    body.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('>'))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_joins_segments() {
        let line = Summary::new("head")
            .segment("a")
            .when(false, || "c".into())
            .when(true, || "d".into());
        assert_eq!(line.to_string(), "head | a | d");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(1, "point", "points"), "1 point");
        assert_eq!(count(0, "point", "points"), "0 points");
        assert_eq!(count(-1, "point", "points"), "-1 points");
        assert_eq!(count(2, "comment", "comments"), "2 comments");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(0.973, 12), "\x030397.3%\x03");
        assert_eq!(ratio(0.5, 0), "\x030450.0%\x03");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(
            timestamp(1700000000.0, "%Y-%m-%d - %H:%M:%S%Z", Tz::UTC),
            "2023-11-14 - 22:13:20UTC"
        );
        assert_eq!(timestamp(0.0, "%Y", Tz::UTC), "1970");
    }

    #[test]
    fn test_timestamp_in_zone() {
        assert_eq!(
            timestamp(1700000000.0, "%Y-%m-%d - %H:%M:%S%Z", Tz::America__New_York),
            "2023-11-14 - 17:13:20EST"
        );
        // Summer time
        assert_eq!(
            timestamp(1690000000.0, "%H:%M %Z", Tz::Europe__Berlin),
            "06:26 CEST"
        );
    }

    #[test]
    fn test_from_epoch_keeps_fraction() {
        let dt = from_epoch(1700000000.25).unwrap();
        assert_eq!(dt.timestamp(), 1700000000);
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_comment_text_drops_quotes() {
        let body = "> quoted\n\nFirst line\n>another quote\nSecond line";
        assert_eq!(comment_text(body), "First line Second line");
    }
}
