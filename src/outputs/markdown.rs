//! Markdown digest of a news feed.
//!
//! # Layout
//!
//! ```text
//! # Crypto News: Bitcoin
//!
//! Sources: CoinDesk RSS, Reddit Crypto · 12 items · updated 2025-05-06 14:30 UTC
//!
//! ## 📰 [Title](https://...)
//! *CoinDesk · 3 hours ago*
//!
//! Description...
//! ```
//!
//! Fallback feeds get a warning banner instead of a source line.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::categories::ALL;
use crate::models::{NewsFeed, NewsItem, NewsKind};
use crate::utils::relative_age;

/// Sources listed by name before the line is cut short with "...".
const MAX_LISTED_SOURCES: usize = 5;

fn kind_icon(kind: NewsKind) -> &'static str {
    match kind {
        NewsKind::Article => "📰",
        NewsKind::Discussion => "💬",
    }
}

fn source_line(feed: &NewsFeed) -> String {
    let mut line = feed
        .sources
        .iter()
        .take(MAX_LISTED_SOURCES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if feed.sources.len() > MAX_LISTED_SOURCES {
        line.push_str("...");
    }
    line
}

fn write_item(md: &mut String, item: &NewsItem, now: DateTime<Utc>) {
    let icon = kind_icon(item.kind);
    match &item.url {
        Some(url) => writeln!(md, "## {} [{}]({})", icon, item.title, url).unwrap(),
        None => writeln!(md, "## {} {}", icon, item.title).unwrap(),
    }
    writeln!(md, "*{} · {}*\n", item.source, relative_age(item.published_at, now)).unwrap();

    if !item.description.is_empty() {
        writeln!(md, "{}\n", item.description).unwrap();
    }
    if item.kind == NewsKind::Discussion {
        writeln!(
            md,
            "▲ {} · {} comments\n",
            item.upvotes.unwrap_or(0),
            item.comments.unwrap_or(0)
        )
        .unwrap();
    }
}

/// Render `items` (already filtered for `category`) from `feed` as Markdown.
///
/// `now` anchors the relative ages.
pub fn feed_to_markdown(
    feed: &NewsFeed,
    items: &[NewsItem],
    category: &str,
    now: DateTime<Utc>,
) -> String {
    let mut md = String::new();

    if category == ALL {
        writeln!(md, "# Crypto News\n").unwrap();
    } else {
        writeln!(md, "# Crypto News: {}\n", category).unwrap();
    }

    if feed.fallback {
        writeln!(
            md,
            "> ⚠️ Live sources are unavailable; showing demo content. Run again to retry.\n"
        )
        .unwrap();
    } else {
        writeln!(
            md,
            "Sources: {} · {} items · updated {}\n",
            source_line(feed),
            feed.items.len(),
            feed.fetched_at.format("%Y-%m-%d %H:%M UTC")
        )
        .unwrap();
    }

    if items.is_empty() {
        writeln!(md, "_No news in this category._").unwrap();
        return md;
    }

    for item in items {
        write_item(&mut md, item, now);
    }
    md
}
