//! News source adapters.
//!
//! Each adapter is a plain descriptor: a display name, one endpoint, a
//! per-call timeout and a mapper that turns the endpoint's JSON into
//! [`NewsItem`]s. Adapters hold no state and never fail past their own
//! boundary; a payload of the wrong shape maps to an empty vector.
//!
//! # Supported Sources
//!
//! | Source | Module | Payload | Timeout |
//! |--------|--------|---------|---------|
//! | CoinDesk RSS | [`rss`] | rss2json | 8s |
//! | CoinTelegraph | [`rss`] | rss2json | 8s |
//! | Jinse Finance | [`rss`] | rss2json | 8s |
//! | Reddit Crypto | [`reddit`] | listing JSON | 10s |
//! | Decrypt | [`rss`] | rss2json | 8s |
//!
//! The order of [`default_sources`] is the polling order.

use crate::models::NewsItem;
use serde_json::Value;
use std::time::Duration;

pub mod reddit;
pub mod rss;

use reddit::RedditProfile;
use rss::{Blurb, RssProfile};

/// Per-call timeout unless an adapter says otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// How an adapter turns a response body into items.
#[derive(Debug, Clone)]
pub enum ItemMapper {
    Rss(RssProfile),
    Reddit(RedditProfile),
}

impl ItemMapper {
    pub fn map(&self, payload: &Value) -> Vec<NewsItem> {
        match self {
            ItemMapper::Rss(profile) => profile.map(payload),
            ItemMapper::Reddit(profile) => profile.map(payload),
        }
    }
}

/// Descriptor of one external news endpoint.
#[derive(Debug, Clone)]
pub struct SourceAdapter {
    pub name: String,
    pub url: String,
    pub timeout: Duration,
    pub mapper: ItemMapper,
}

impl SourceAdapter {
    pub fn new(name: &str, url: &str, timeout: Duration, mapper: ItemMapper) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            timeout,
            mapper,
        }
    }

    /// Map a response body to items.
    pub fn parse(&self, payload: &Value) -> Vec<NewsItem> {
        self.mapper.map(payload)
    }
}

/// Endpoint of the public rss2json proxy for a raw RSS feed URL.
pub fn rss2json_url(feed: &str) -> String {
    format!(
        "https://api.rss2json.com/v1/api.json?rss_url={}",
        urlencoding::encode(feed)
    )
}

/// The fixed adapter list, in polling order.
pub fn default_sources() -> Vec<SourceAdapter> {
    vec![
        SourceAdapter::new(
            "CoinDesk RSS",
            &rss2json_url("https://www.coindesk.com/arc/outboundfeeds/rss/"),
            DEFAULT_TIMEOUT,
            ItemMapper::Rss(RssProfile {
                id_prefix: "coindesk",
                source_label: "CoinDesk",
                max_items: 20,
                blurb: Blurb::Excerpt(120),
                image_from_description: true,
                categories: &["News", "English"],
            }),
        ),
        SourceAdapter::new(
            "CoinTelegraph",
            &rss2json_url("https://cointelegraph.com/rss"),
            DEFAULT_TIMEOUT,
            ItemMapper::Rss(RssProfile {
                id_prefix: "cointelegraph",
                source_label: "CoinTelegraph",
                max_items: 15,
                blurb: Blurb::Excerpt(100),
                image_from_description: true,
                categories: &["News", "English"],
            }),
        ),
        SourceAdapter::new(
            "Jinse Finance",
            &rss2json_url("https://www.jinse.com/rss"),
            DEFAULT_TIMEOUT,
            ItemMapper::Rss(RssProfile {
                id_prefix: "jinse",
                source_label: "金色财经",
                max_items: 12,
                blurb: Blurb::Fixed("金色财经 - 区块链行业新闻"),
                image_from_description: false,
                categories: &["News", "Chinese"],
            }),
        ),
        SourceAdapter::new(
            "Reddit Crypto",
            "https://www.reddit.com/r/CryptoCurrency/hot.json?limit=15",
            Duration::from_millis(10_000),
            ItemMapper::Reddit(RedditProfile {
                source_label: "Reddit r/CryptoCurrency",
                excerpt_chars: 80,
                categories: &["Community", "Discussion"],
            }),
        ),
        SourceAdapter::new(
            "Decrypt",
            &rss2json_url("https://decrypt.co/feed"),
            DEFAULT_TIMEOUT,
            ItemMapper::Rss(RssProfile {
                id_prefix: "decrypt",
                source_label: "Decrypt",
                max_items: 10,
                blurb: Blurb::Excerpt(90),
                image_from_description: true,
                categories: &["News", "Technology"],
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_sources_order_and_timeouts() {
        let sources = default_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["CoinDesk RSS", "CoinTelegraph", "Jinse Finance", "Reddit Crypto", "Decrypt"]
        );
        for source in &sources {
            let expected = if source.name == "Reddit Crypto" {
                Duration::from_millis(10_000)
            } else {
                DEFAULT_TIMEOUT
            };
            assert_eq!(source.timeout, expected, "{}", source.name);
        }
    }

    #[test]
    fn test_rss2json_url_encodes_feed() {
        assert_eq!(
            rss2json_url("https://cointelegraph.com/rss"),
            "https://api.rss2json.com/v1/api.json?rss_url=https%3A%2F%2Fcointelegraph.com%2Frss"
        );
    }

    #[test]
    fn test_every_adapter_tolerates_garbage() {
        for source in default_sources() {
            assert!(source.parse(&json!("not an object")).is_empty(), "{}", source.name);
            assert!(source.parse(&json!({})).is_empty(), "{}", source.name);
        }
    }
}
