//! Utility functions for text cleanup, date parsing and time formatting.
//!
//! This module provides helper functions used throughout the application:
//! - HTML stripping and image extraction for feed descriptions
//! - Character-safe truncation for excerpts and log previews
//! - Parsing of the date formats the upstream feeds emit
//! - Human-readable relative ages for rendered output

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended. Cuts always land on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Build a description excerpt: the first `max_chars` characters followed by `...`.
///
/// The ellipsis is appended unconditionally, matching how every feed
/// excerpt is presented.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Strip markup from an HTML fragment and return its trimmed text content.
///
/// Entities such as `&amp;` and `&nbsp;` are decoded by the HTML parser.
pub fn clean_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.replace('\u{a0}', " ").trim().to_string()
}

/// Return the `src` of the first `<img>` in an HTML fragment, if any.
pub fn first_image_src(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&IMG_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
}

/// Parse a feed publication date.
///
/// Accepted forms, tried in order:
/// - `2025-05-06 14:30:00` (rss2json, always UTC)
/// - RFC 2822 (`Tue, 06 May 2025 14:30:00 +0000`), as found in raw RSS
/// - RFC 3339 (`2025-05-06T14:30:00Z`)
///
/// Returns `None` for anything else.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert epoch seconds (possibly fractional) to a UTC timestamp.
pub fn from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
}

/// Describe how long before `now` something was published.
///
/// Uses the largest whole unit: days, then hours, then minutes, else
/// "just now". Missing dates render as "unknown".
pub fn relative_age(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published_at) = published_at else {
        return "unknown".to_string();
    };
    let diff = now - published_at;
    let minutes = diff.num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("金色财经新闻", 2);
        assert_eq!(result, "金色…(+12 bytes)");
    }

    #[test]
    fn test_excerpt_counts_chars_and_appends_ellipsis() {
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("ab", 3), "ab...");
        assert_eq!(excerpt("比特币突破", 2), "比特...");
    }

    #[test]
    fn test_clean_html_strips_tags_and_entities() {
        let html = "<p>Bitcoin&nbsp;rallies <b>5%</b> &amp; more</p>  ";
        assert_eq!(clean_html(html), "Bitcoin rallies 5% & more");
    }

    #[test]
    fn test_first_image_src() {
        let html = r#"<p>x</p><img alt="a" src="https://img.example.com/1.jpg"><img src="https://img.example.com/2.jpg">"#;
        assert_eq!(
            first_image_src(html).as_deref(),
            Some("https://img.example.com/1.jpg")
        );
        assert_eq!(first_image_src("<p>no image</p>"), None);
    }

    #[test]
    fn test_parse_pub_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        assert_eq!(parse_pub_date("2025-05-06 14:30:00"), Some(expected));
        assert_eq!(
            parse_pub_date("Tue, 06 May 2025 16:30:00 +0200"),
            Some(expected)
        );
        assert_eq!(parse_pub_date("2025-05-06T14:30:00Z"), Some(expected));
        assert_eq!(parse_pub_date("yesterday"), None);
        assert_eq!(parse_pub_date(""), None);
    }

    #[test]
    fn test_from_epoch_secs() {
        let dt = from_epoch_secs(1_746_541_800.0).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap());
        assert_eq!(from_epoch_secs(f64::NAN), None);
    }

    #[test]
    fn test_relative_age() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        assert_eq!(relative_age(None, now), "unknown");
        assert_eq!(relative_age(Some(now), now), "just now");
        assert_eq!(relative_age(Some(now - Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(relative_age(Some(now - Duration::minutes(59)), now), "59 minutes ago");
        assert_eq!(relative_age(Some(now - Duration::hours(3)), now), "3 hours ago");
        assert_eq!(relative_age(Some(now - Duration::days(2)), now), "2 days ago");
    }
}
