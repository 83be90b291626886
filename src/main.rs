//! # Crypto News
//!
//! Aggregates cryptocurrency news from several public, key-less feeds and
//! prints a deduplicated, recency-ranked digest.
//!
//! ## Features
//!
//! - Polls CoinDesk, CoinTelegraph, Jinse Finance, r/CryptoCurrency and
//!   Decrypt in a fixed order, stopping once enough items are collected
//! - Bounds every source call with its own timeout; failing sources are skipped
//! - Deduplicates by normalized title prefix and ranks by publication time
//! - Serves canned demo items when every source comes back empty
//! - Filters by keyword category and renders Markdown or JSON
//! - Optional watch mode that re-runs the pipeline on a fixed interval
//!
//! ## Usage
//!
//! ```sh
//! crypto_news --category Bitcoin --limit 10
//! crypto_news --watch --format json --output ./news.json
//! crypto_news settings interval 300
//! ```
//!
//! ## Architecture
//!
//! One aggregation pass:
//! 1. **Aggregate**: sequentially poll the source adapters until the quota is met
//! 2. **Deduplicate / Rank**: drop repeated headlines, newest first
//! 3. **Fallback**: canned items if nothing survived
//! 4. **Output**: category filter, then Markdown or JSON to stdout or a file

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod categories;
mod cli;
mod fallback;
mod models;
mod outputs;
mod pipeline;
mod settings;
mod sources;
mod utils;

use api::{FetchJson, HttpFetcher};
use categories::{filter_by_category, get_categories};
use cli::{Cli, Command, Format, SettingsAction};
use models::NewsFeed;
use outputs::{emit, json, markdown};
use pipeline::get_news;
use settings::SettingsStore;
use sources::{SourceAdapter, default_sources};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout carries only the rendered output) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    let store = SettingsStore::new(&args.settings);

    match &args.command {
        Some(Command::Categories) => return emit(&get_categories().join("\n"), None).await,
        Some(Command::Settings { action }) => return run_settings(&store, action.as_ref()).await,
        None => {}
    }

    let fetcher = HttpFetcher::new()?;
    let sources = default_sources();

    if args.watch {
        let mut settings = store.load().await?;
        if let Some(secs) = args.interval {
            settings.set_refresh_interval(secs)?;
        }
        info!(
            every_secs = settings.refresh_interval,
            theme = %settings.theme,
            "Starting watch mode"
        );
        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Could not listen for Ctrl-C");
            }
        };
        watch(
            &fetcher,
            &sources,
            &args,
            Duration::from_secs(settings.refresh_interval),
            interrupted,
        )
        .await
    } else if let Err(e) = refresh_once(&fetcher, &sources, &args).await {
        error!(error = %e, "Failed to produce news output");
        Err(e)
    } else {
        Ok(())
    }
}

/// Run one aggregation pass, filter it and write the rendered result.
#[instrument(level = "info", skip_all, fields(limit = args.limit, category = %args.category))]
async fn refresh_once<F>(
    fetcher: &F,
    sources: &[SourceAdapter],
    args: &Cli,
) -> Result<(), Box<dyn Error>>
where
    F: FetchJson,
{
    let feed = get_news(fetcher, sources, args.limit).await;
    let items = filter_by_category(&feed.items, &args.category);
    info!(
        total = feed.items.len(),
        shown = items.len(),
        fallback = feed.fallback,
        "Filtered feed"
    );

    let rendered = match args.format {
        Format::Json => json::feed_to_json(&NewsFeed { items, ..feed })?,
        Format::Markdown => markdown::feed_to_markdown(&feed, &items, &args.category, Utc::now()),
    };
    emit(&rendered, args.output.as_deref()).await
}

/// Re-run the pipeline every `every` until `shutdown` resolves.
///
/// Shutdown stops future ticks and drops a pass that is still in flight, so
/// its result never reaches the output. A failed pass is logged and the
/// loop waits for the next tick.
async fn watch<F, S>(
    fetcher: &F,
    sources: &[SourceAdapter],
    args: &Cli,
    every: Duration,
    shutdown: S,
) -> Result<(), Box<dyn Error>>
where
    F: FetchJson,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted; stopping refresh loop");
                break;
            }
            _ = ticker.tick() => {}
        }

        tokio::select! {
            res = refresh_once(fetcher, sources, args) => {
                if let Err(e) = res {
                    error!(error = %e, "Refresh failed; retrying on the next tick");
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted during refresh; discarding in-flight pass");
                break;
            }
        }
    }
    Ok(())
}

/// Apply a `settings` subcommand and print the resulting settings.
#[instrument(level = "info", skip(store), fields(path = %store.path().display()))]
async fn run_settings(
    store: &SettingsStore,
    action: Option<&SettingsAction>,
) -> Result<(), Box<dyn Error>> {
    match action {
        None | Some(SettingsAction::Show) => {}
        Some(SettingsAction::Theme { theme }) => {
            let mut settings = store.load().await?;
            settings.theme = theme.parse()?;
            store.save(&settings).await?;
        }
        Some(SettingsAction::Interval { seconds }) => {
            let mut settings = store.load().await?;
            settings.set_refresh_interval(*seconds)?;
            store.save(&settings).await?;
        }
        Some(SettingsAction::Reset) => store.reset().await?,
    }

    let settings = store.load().await?;
    emit(&serde_yaml::to_string(&settings)?, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::stub::{Reply, StubFetcher};
    use sources::ItemMapper;
    use sources::rss::{Blurb, RssProfile};

    fn adapter(timeout: Duration) -> SourceAdapter {
        SourceAdapter::new(
            "Test Feed",
            "https://feeds.test/watch",
            timeout,
            ItemMapper::Rss(RssProfile {
                id_prefix: "t",
                source_label: "Test",
                max_items: 10,
                blurb: Blurb::Excerpt(40),
                image_from_description: false,
                categories: &["News"],
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_pass_waits_for_next_tick() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let output = blocker.join("news.md");
        let args = Cli::parse_from(["crypto_news", "--watch", "--output", output.to_str().unwrap()]);

        let sources = vec![adapter(Duration::from_secs(1))];
        let fetcher = StubFetcher::new().reply("https://feeds.test/watch", Reply::Status(500));

        // Ticks at 0s, 10s and 20s; every pass fails to write its output.
        let shutdown = tokio::time::sleep(Duration::from_secs(25));
        watch(&fetcher, &sources, &args, Duration::from_secs(10), shutdown)
            .await
            .unwrap();

        assert_eq!(fetcher.calls().len(), 3);
        assert!(!output.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_in_flight_pass() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("news.json");
        let args = Cli::parse_from([
            "crypto_news",
            "--watch",
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ]);

        let sources = vec![adapter(Duration::from_secs(60))];
        let fetcher = StubFetcher::new().reply("https://feeds.test/watch", Reply::Hang);

        let shutdown = tokio::time::sleep(Duration::from_secs(5));
        watch(&fetcher, &sources, &args, Duration::from_secs(10), shutdown)
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), vec!["https://feeds.test/watch"]);
        assert!(!output.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_future_ticks() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("news.md");
        let args = Cli::parse_from(["crypto_news", "--watch", "--output", output.to_str().unwrap()]);

        let sources = vec![adapter(Duration::from_secs(1))];
        let fetcher = StubFetcher::new().reply(
            "https://feeds.test/watch",
            Reply::Json(serde_json::json!({
                "items": [{"title": "BTC holds steady", "guid": "g1"}]
            })),
        );

        // One pass at 0s; shutdown at 5s comes before the 10s tick.
        let shutdown = tokio::time::sleep(Duration::from_secs(5));
        watch(&fetcher, &sources, &args, Duration::from_secs(10), shutdown)
            .await
            .unwrap();

        assert_eq!(fetcher.calls().len(), 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("BTC holds steady"));
    }
}
