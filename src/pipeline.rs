//! The news aggregation pipeline.
//!
//! One aggregation pass runs these stages in order:
//! 1. **Aggregate**: poll the sources one at a time until the quota is met
//! 2. **Deduplicate**: drop items whose normalized title prefix repeats
//! 3. **Rank**: stable sort, most recent first
//! 4. **Fallback**: substitute canned items if nothing survived
//!
//! [`get_news`] is the only entry point callers need. Category filtering is
//! applied afterwards by the caller (see [`crate::categories`]).

use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::api::{FetchJson, fetch_with_timeout};
use crate::fallback::fallback_news;
use crate::models::{Aggregation, NewsFeed, NewsItem};
use crate::sources::SourceAdapter;

/// Number of title characters that form the dedup key.
const DEDUP_PREFIX_CHARS: usize = 50;

/// Poll `sources` strictly in order until at least `target` items are collected.
///
/// Each source is awaited fully before the next one starts. A source that
/// times out, answers with a non-success status or sends a body that is not
/// JSON is logged and skipped. Only sources that returned at least one item
/// are recorded in [`Aggregation::sources`].
#[instrument(level = "info", skip_all, fields(quota = target, sources = sources.len()))]
pub async fn aggregate<F>(fetcher: &F, sources: &[SourceAdapter], target: usize) -> Aggregation
where
    F: FetchJson,
{
    let mut out = Aggregation::default();

    for source in sources {
        if out.items.len() >= target {
            debug!(collected = out.items.len(), "Quota met; not polling remaining sources");
            break;
        }

        let t0 = Instant::now();
        match fetch_with_timeout(fetcher, &source.url, source.timeout).await {
            Ok(payload) => {
                let items = source.parse(&payload);
                let elapsed_ms = t0.elapsed().as_millis() as u64;
                if items.is_empty() {
                    warn!(source = %source.name, elapsed_ms, "Source returned no usable items");
                } else {
                    info!(source = %source.name, count = items.len(), elapsed_ms, "Fetched source");
                    out.items.extend(items);
                    out.sources.push(source.name.clone());
                }
            }
            Err(e) => {
                warn!(
                    source = %source.name,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Source failed; skipping"
                );
            }
        }
    }

    info!(
        count = out.items.len(),
        sources = %out.sources.join(", "),
        "Aggregation finished"
    );
    out
}

/// Key two items collide on: trimmed, lowercased title cut to 50 characters.
pub fn dedup_key(title: &str) -> String {
    title
        .to_lowercase()
        .trim()
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect()
}

/// Remove duplicate items, keeping the first occurrence.
///
/// Items collide when their [`dedup_key`]s match. Items that repeat an
/// earlier `id` are dropped as well, so ids are unique in the output.
pub fn dedupe(items: Vec<NewsItem>) -> Vec<NewsItem> {
    items
        .into_iter()
        .unique_by(|item| dedup_key(&item.title))
        .unique_by(|item| item.id.clone())
        .collect()
}

fn by_recency(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, most recent first. Undated items go last, in input order.
pub fn rank(mut items: Vec<NewsItem>) -> Vec<NewsItem> {
    items.sort_by(|a, b| by_recency(&a.published_at, &b.published_at));
    items
}

/// Run one full aggregation pass and return at most `limit` items.
///
/// When aggregation, deduplication and ranking leave nothing, the canned
/// fallback set (capped to `limit`) is returned with `fallback` set. The
/// fallback never backfills a partial result.
#[instrument(level = "info", skip(fetcher, sources))]
pub async fn get_news<F>(fetcher: &F, sources: &[SourceAdapter], limit: usize) -> NewsFeed
where
    F: FetchJson,
{
    let t0 = Instant::now();
    let Aggregation { items, sources: contributed } = aggregate(fetcher, sources, limit).await;

    let fetched = items.len();
    let mut ranked = rank(dedupe(items));
    debug!(fetched, unique = ranked.len(), "Deduplicated and ranked");

    let fetched_at = Utc::now();
    let feed = if ranked.is_empty() {
        warn!("All sources failed; serving fallback news");
        let mut items = fallback_news(fetched_at);
        items.truncate(limit);
        NewsFeed {
            fetched_at,
            fallback: true,
            sources: Vec::new(),
            items,
        }
    } else {
        ranked.truncate(limit);
        NewsFeed {
            fetched_at,
            fallback: false,
            sources: contributed,
            items: ranked,
        }
    };

    info!(
        count = feed.items.len(),
        fallback = feed.fallback,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "News pass complete"
    );
    feed
}
