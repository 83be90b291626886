//! Command-line interface definitions for the crypto news aggregator.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Running without a subcommand performs one aggregation pass (or keeps
//! refreshing with `--watch`).

use clap::{Parser, Subcommand, ValueEnum};

use crate::categories::get_categories;

/// Command-line arguments for the crypto news aggregator.
///
/// # Examples
///
/// ```sh
/// # Twenty latest items as Markdown
/// crypto_news
///
/// # Only Bitcoin stories, as JSON written to a file
/// crypto_news --category Bitcoin --format json --output ./news.json
///
/// # Refresh every five minutes until Ctrl-C
/// crypto_news --watch --interval 300
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Maximum number of items to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// Only show items in this category
    #[arg(short, long, default_value = "All", value_parser = parse_category)]
    pub category: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    pub format: Format,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Keep refreshing until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between refreshes in watch mode (defaults to the saved setting)
    #[arg(short, long, requires = "watch")]
    pub interval: Option<u64>,

    /// Path to the settings file
    #[arg(long, env = "CRYPTO_NEWS_SETTINGS", default_value = "crypto_news.yaml")]
    pub settings: String,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List the available categories
    Categories,
    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Set the theme (light, dark or auto)
    Theme { theme: String },
    /// Set the refresh interval in seconds
    Interval { seconds: u64 },
    /// Remove saved settings
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Markdown,
}

/// Accept a known category name, ignoring case, and return its canonical spelling.
fn parse_category(raw: &str) -> Result<String, String> {
    get_categories()
        .iter()
        .find(|c| c.eq_ignore_ascii_case(raw.trim()))
        .map(|c| c.to_string())
        .ok_or_else(|| format!("expected one of: {}", get_categories().join(", ")))
}
