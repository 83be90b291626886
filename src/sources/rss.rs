//! Adapter for RSS feeds proxied through rss2json.
//!
//! The proxy answers with `{"status": "ok", "items": [...]}` where each item
//! carries `title`, `description` (HTML), `link`, `guid` and `pubDate`.
//! One [`RssProfile`] per outlet decides how many items to keep and how the
//! description and image are derived.

use crate::models::{NewsItem, NewsKind, PLACEHOLDER_IMAGE};
use crate::utils::{clean_html, excerpt, first_image_src, parse_pub_date};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// How the item description is produced.
#[derive(Debug, Clone, Copy)]
pub enum Blurb {
    /// HTML-stripped upstream description cut to this many characters.
    Excerpt(usize),
    /// The same text for every item of the feed.
    Fixed(&'static str),
}

/// Per-outlet mapping rules for an rss2json payload.
#[derive(Debug, Clone)]
pub struct RssProfile {
    pub id_prefix: &'static str,
    pub source_label: &'static str,
    pub max_items: usize,
    pub blurb: Blurb,
    pub image_from_description: bool,
    pub categories: &'static [&'static str],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedItem {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RssProfile {
    /// Map an rss2json payload to items; anything unexpected yields nothing.
    pub fn map(&self, payload: &Value) -> Vec<NewsItem> {
        let Some(items) = payload.get("items").and_then(Value::as_array) else {
            warn!(source = self.source_label, "Payload has no items array");
            return Vec::new();
        };

        items
            .iter()
            .take(self.max_items)
            .filter_map(|raw| match FeedItem::deserialize(raw) {
                Ok(item) => self.to_news_item(item),
                Err(e) => {
                    debug!(source = self.source_label, error = %e, "Skipping malformed feed item");
                    None
                }
            })
            .collect()
    }

    fn to_news_item(&self, item: FeedItem) -> Option<NewsItem> {
        let title = non_empty(&item.title)?.to_string();
        let key = non_empty(&item.guid).or_else(|| non_empty(&item.link))?;
        let html = item.description.as_deref().unwrap_or_default();

        let description = match self.blurb {
            Blurb::Excerpt(len) => excerpt(&clean_html(html), len),
            Blurb::Fixed(text) => text.to_string(),
        };
        let image = self
            .image_from_description
            .then(|| first_image_src(html))
            .flatten()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        let url = non_empty(&item.link)
            .filter(|link| Url::parse(link).is_ok())
            .map(str::to_string);

        Some(NewsItem {
            id: format!("{}-{}", self.id_prefix, key),
            title,
            description,
            url,
            source: self.source_label.to_string(),
            image,
            published_at: item.pub_date.as_deref().and_then(parse_pub_date),
            categories: self.categories.iter().map(|c| c.to_string()).collect(),
            kind: NewsKind::Article,
            upvotes: None,
            comments: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn coindesk() -> RssProfile {
        RssProfile {
            id_prefix: "coindesk",
            source_label: "CoinDesk",
            max_items: 2,
            blurb: Blurb::Excerpt(12),
            image_from_description: true,
            categories: &["News", "English"],
        }
    }

    #[test]
    fn test_maps_rss2json_item() {
        let payload = json!({
            "status": "ok",
            "items": [{
                "title": "Bitcoin tops $100k",
                "pubDate": "2025-05-06 14:30:00",
                "link": "https://www.coindesk.com/markets/btc",
                "guid": "https://www.coindesk.com/?p=1",
                "description": "<img src=\"https://cdn.coindesk.com/a.jpg\"><p>Price action &amp; flows today</p>"
            }]
        });

        let items = coindesk().map(&payload);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "coindesk-https://www.coindesk.com/?p=1");
        assert_eq!(item.description, "Price action...");
        assert_eq!(item.image, "https://cdn.coindesk.com/a.jpg");
        assert_eq!(item.url.as_deref(), Some("https://www.coindesk.com/markets/btc"));
        assert_eq!(item.source, "CoinDesk");
        assert_eq!(item.kind, NewsKind::Article);
        assert_eq!(item.categories, vec!["News", "English"]);
        assert_eq!(
            item.published_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_respects_max_items() {
        let payload = json!({
            "items": [
                {"title": "a", "guid": "1"},
                {"title": "b", "guid": "2"},
                {"title": "c", "guid": "3"}
            ]
        });
        assert_eq!(coindesk().map(&payload).len(), 2);
    }

    #[test]
    fn test_falls_back_to_link_and_placeholder() {
        let payload = json!({
            "items": [{"title": "No guid", "link": "https://x.example/1", "description": "plain"}]
        });
        let item = &coindesk().map(&payload)[0];
        assert_eq!(item.id, "coindesk-https://x.example/1");
        assert_eq!(item.image, PLACEHOLDER_IMAGE);
        assert_eq!(item.published_at, None);
    }

    #[test]
    fn test_fixed_blurb_and_no_image_lookup() {
        let profile = RssProfile {
            id_prefix: "jinse",
            source_label: "金色财经",
            max_items: 12,
            blurb: Blurb::Fixed("金色财经 - 区块链行业新闻"),
            image_from_description: false,
            categories: &["News", "Chinese"],
        };
        let payload = json!({
            "items": [{"title": "比特币", "guid": "j1", "description": "<img src=\"https://x/y.png\">"}]
        });
        let item = &profile.map(&payload)[0];
        assert_eq!(item.description, "金色财经 - 区块链行业新闻");
        assert_eq!(item.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_skips_untitled_and_malformed_entries() {
        let payload = json!({
            "items": [
                {"guid": "1"},
                "garbage",
                {"title": "   ", "guid": "2"},
                {"title": "kept", "guid": "3", "link": "not a url"}
            ]
        });
        let profile = RssProfile { max_items: 10, ..coindesk() };
        let items = profile.map(&payload);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
        assert_eq!(items[0].url, None);
    }

    #[test]
    fn test_missing_items_yields_empty() {
        assert!(coindesk().map(&json!({"status": "error"})).is_empty());
        assert!(coindesk().map(&json!({"items": "nope"})).is_empty());
    }
}
