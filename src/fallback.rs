//! Canned news served when every source comes back empty.
//!
//! The set is fixed: five articles, the newest one hour before the call and
//! each following one an hour older. Nothing here touches the network.

use chrono::{DateTime, Duration, Utc};

use crate::models::{NewsItem, NewsKind, PLACEHOLDER_IMAGE};

struct Canned {
    title: &'static str,
    description: &'static str,
    url: &'static str,
    source: &'static str,
    categories: [&'static str; 2],
}

const CANNED: [Canned; 5] = [
    Canned {
        title: "加密市场动态：比特币突破关键价位",
        description: "比特币价格突破重要技术阻力位，市场情绪转暖，分析师看好短期走势...",
        url: "https://www.coindesk.com",
        source: "市场快讯",
        categories: ["Bitcoin", "Market"],
    },
    Canned {
        title: "以太坊网络升级进展顺利",
        description: "以太坊2.0验证节点数量稳步增长，网络安全性进一步提升...",
        url: "https://cointelegraph.com",
        source: "技术更新",
        categories: ["Ethereum", "Technology"],
    },
    Canned {
        title: "DeFi生态持续扩张",
        description: "去中心化金融协议总锁仓价值创新高，用户参与度持续提升...",
        url: "https://decrypt.co",
        source: "DeFi日报",
        categories: ["DeFi", "Finance"],
    },
    Canned {
        title: "NFT市场交易活跃",
        description: "数字收藏品市场出现新热点，多个NFT项目交易量显著增长...",
        url: "https://www.jinse.com",
        source: "NFT观察",
        categories: ["NFT", "Market"],
    },
    Canned {
        title: "全球监管框架逐步完善",
        description: "各国加密资产监管政策陆续出台，市场规范化进程加速...",
        url: "https://cryptoslate.com",
        source: "政策动态",
        categories: ["Regulation", "Policy"],
    },
];

/// Build the fallback set relative to `now`.
///
/// Item `n` (1-based) is stamped `n` hours before `now` and gets the id
/// `fallback-<now millis>-<n>`.
pub fn fallback_news(now: DateTime<Utc>) -> Vec<NewsItem> {
    let stamp = now.timestamp_millis();
    CANNED
        .iter()
        .zip(1i64..)
        .map(|(canned, n)| NewsItem {
            id: format!("fallback-{stamp}-{n}"),
            title: canned.title.to_string(),
            description: canned.description.to_string(),
            url: Some(canned.url.to_string()),
            source: canned.source.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            published_at: Some(now - Duration::hours(n)),
            categories: canned.categories.iter().map(|c| c.to_string()).collect(),
            kind: NewsKind::Article,
            upvotes: None,
            comments: None,
        })
        .collect()
}
