//! Keyword-based category filtering.
//!
//! Categories are a view concern: the pipeline never tags items with them.
//! An item belongs to a category when its title, description or source
//! categories contain one of the category's keywords as a plain,
//! case-insensitive substring ("btc" matches inside "btcusd").

use crate::models::NewsItem;

/// The identity category.
pub const ALL: &str = "All";

const CATEGORIES: [&str; 9] = [
    ALL,
    "Bitcoin",
    "Ethereum",
    "DeFi",
    "NFT",
    "Market",
    "Technology",
    "Chinese",
    "Community",
];

const KEYWORDS: &[(&str, &[&str])] = &[
    ("Bitcoin", &["bitcoin", "btc"]),
    ("Ethereum", &["ethereum", "eth"]),
    ("DeFi", &["defi", "decentralized finance"]),
    ("NFT", &["nft", "non-fungible"]),
    ("Market", &["market", "price", "trading", "投资"]),
    ("Technology", &["technology", "tech", "upgrade", "技术"]),
    ("Chinese", &["chinese", "中文", "金色财经"]),
    ("Community", &["community", "discussion", "reddit"]),
];

/// The selectable categories, `"All"` first.
pub fn get_categories() -> &'static [&'static str] {
    &CATEGORIES
}

/// Keywords that select `category`. Unknown labels match on their own
/// lowercased name.
pub fn keywords_for(category: &str) -> Vec<String> {
    KEYWORDS
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, words)| words.iter().map(|w| w.to_lowercase()).collect())
        .unwrap_or_else(|| vec![category.to_lowercase()])
}

/// Return the items of `items` that belong to `category`, in order.
pub fn filter_by_category(items: &[NewsItem], category: &str) -> Vec<NewsItem> {
    if category == ALL {
        return items.to_vec();
    }

    let keywords = keywords_for(category);
    items
        .iter()
        .filter(|item| {
            let text = item.search_text();
            keywords.iter().any(|k| text.contains(k.as_str()))
        })
        .cloned()
        .collect()
}
