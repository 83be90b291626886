//! JSON rendering of a news feed.
//!
//! The document is the [`NewsFeed`] itself: fetch time, fallback flag,
//! contributing sources and the items in ranked order.

use crate::models::NewsFeed;

/// Serialize `feed` as pretty-printed JSON.
pub fn feed_to_json(feed: &NewsFeed) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(feed)
}
