//! Data models for aggregated news items and pipeline results.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsItem`]: A normalized article or discussion from one upstream source
//! - [`NewsKind`]: Whether an item is an editorial article or a community post
//! - [`Aggregation`]: Raw accumulator produced by polling the sources
//! - [`NewsFeed`]: Final, ranked result of one aggregation pass
//!
//! Items are built once by a source adapter (or the fallback provider) and
//! never mutated afterwards; a refresh replaces the whole feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown for items whose source provides none.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1620336655055-bd87c5d1d73f?w=300&h=200&fit=crop";

/// The kind of content an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    /// Editorial content from a news outlet.
    Article,
    /// A community thread; may carry upvote and comment counters.
    Discussion,
}

/// A single normalized news entry.
///
/// # Fields
///
/// * `id` - Source-prefixed identifier derived from the upstream guid, link or post id
/// * `published_at` - `None` when the upstream date could not be parsed
/// * `url` - `None` disables any "open original" affordance
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    /// Plain-text excerpt, truncated per source with a trailing ellipsis.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable provider name.
    pub source: String,
    pub image: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(rename = "type")]
    pub kind: NewsKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
}

impl NewsItem {
    /// Text searched by the category filter: title, description and the
    /// joined categories, lowercased.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.categories.join(" ")
        )
        .to_lowercase()
    }
}

/// Output of the aggregator before deduplication and ranking.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Every item returned by the sources that were polled, in polling order.
    pub items: Vec<NewsItem>,
    /// Names of the sources that contributed at least one item.
    pub sources: Vec<String>,
}

/// The result of one aggregation pass.
///
/// `items` is capped to the requested limit and sorted most recent first.
/// When `fallback` is set the items are canned content and `sources` is empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsFeed {
    pub fetched_at: DateTime<Utc>,
    pub fallback: bool,
    pub sources: Vec<String>,
    pub items: Vec<NewsItem>,
}
