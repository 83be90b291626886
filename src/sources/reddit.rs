//! Adapter for a subreddit listing (`/r/<name>/hot.json`).
//!
//! Posts arrive as `data.children[].data` with `id`, `title`, `selftext`,
//! `permalink`, `created_utc` (epoch seconds), `ups` and `num_comments`.
//! Every post becomes a [`NewsKind::Discussion`] item carrying its counters.

use crate::models::{NewsItem, NewsKind, PLACEHOLDER_IMAGE};
use crate::utils::{excerpt, from_epoch_secs};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Description used for link posts that have no body text.
const EMPTY_SELFTEXT_BLURB: &str = "View the community discussion...";

/// Mapping rules for a subreddit listing.
#[derive(Debug, Clone)]
pub struct RedditProfile {
    pub source_label: &'static str,
    pub excerpt_chars: usize,
    pub categories: &'static [&'static str],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Post {
    id: Option<String>,
    title: Option<String>,
    selftext: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    ups: Option<i64>,
    num_comments: Option<i64>,
}

impl RedditProfile {
    /// Map a listing payload to items; anything unexpected yields nothing.
    pub fn map(&self, payload: &Value) -> Vec<NewsItem> {
        let Some(children) = payload
            .pointer("/data/children")
            .and_then(Value::as_array)
        else {
            warn!(source = self.source_label, "Payload has no data.children array");
            return Vec::new();
        };

        children
            .iter()
            .filter_map(|child| {
                let raw = child.get("data")?;
                match Post::deserialize(raw) {
                    Ok(post) => self.to_news_item(post),
                    Err(e) => {
                        debug!(source = self.source_label, error = %e, "Skipping malformed post");
                        None
                    }
                }
            })
            .collect()
    }

    fn to_news_item(&self, post: Post) -> Option<NewsItem> {
        let id = post.id.filter(|id| !id.is_empty())?;
        let title = post.title.filter(|t| !t.trim().is_empty())?;

        let description = match post.selftext.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => excerpt(text, self.excerpt_chars),
            _ => EMPTY_SELFTEXT_BLURB.to_string(),
        };
        let url = post
            .permalink
            .filter(|p| p.starts_with('/'))
            .map(|p| format!("https://reddit.com{p}"));

        Some(NewsItem {
            id: format!("reddit-{id}"),
            title,
            description,
            url,
            source: self.source_label.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            published_at: post.created_utc.and_then(from_epoch_secs),
            categories: self.categories.iter().map(|c| c.to_string()).collect(),
            kind: NewsKind::Discussion,
            upvotes: Some(post.ups.unwrap_or(0).max(0) as u64),
            comments: Some(post.num_comments.unwrap_or(0).max(0) as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn profile() -> RedditProfile {
        RedditProfile {
            source_label: "Reddit r/CryptoCurrency",
            excerpt_chars: 10,
            categories: &["Community", "Discussion"],
        }
    }

    #[test]
    fn test_maps_listing_post() {
        let payload = json!({
            "kind": "Listing",
            "data": {"children": [{"kind": "t3", "data": {
                "id": "1a2b3c",
                "title": "Daily Discussion",
                "selftext": "Welcome to the daily thread",
                "permalink": "/r/CryptoCurrency/comments/1a2b3c/daily/",
                "created_utc": 1746541800.0,
                "ups": 321,
                "num_comments": 1024
            }}]}
        });

        let items = profile().map(&payload);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "reddit-1a2b3c");
        assert_eq!(item.description, "Welcome to...");
        assert_eq!(
            item.url.as_deref(),
            Some("https://reddit.com/r/CryptoCurrency/comments/1a2b3c/daily/")
        );
        assert_eq!(item.kind, NewsKind::Discussion);
        assert_eq!(item.upvotes, Some(321));
        assert_eq!(item.comments, Some(1024));
        assert_eq!(
            item.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_selftext_uses_blurb() {
        let payload = json!({"data": {"children": [{"data": {
            "id": "x", "title": "Link post", "selftext": "", "created_utc": 1.0
        }}]}});
        let item = &profile().map(&payload)[0];
        assert_eq!(item.description, EMPTY_SELFTEXT_BLURB);
        assert_eq!(item.url, None);
        assert_eq!(item.upvotes, Some(0));
    }

    #[test]
    fn test_skips_posts_without_id_or_title() {
        let payload = json!({"data": {"children": [
            {"data": {"title": "no id"}},
            {"data": {"id": "y"}},
            {"no_data": true},
            {"data": {"id": "z", "title": "ok"}}
        ]}});
        let items = profile().map(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "reddit-z");
    }

    #[test]
    fn test_wrong_shape_yields_empty() {
        assert!(profile().map(&json!({"data": {}})).is_empty());
        assert!(profile().map(&json!([1, 2, 3])).is_empty());
    }
}
