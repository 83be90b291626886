//! Output generation for aggregated news.
//!
//! # Submodules
//!
//! - [`json`]: Serializes a [`crate::models::NewsFeed`] for other programs
//! - [`markdown`]: Renders a feed as a readable digest
//!
//! Both write either to a file (parent directories are created) or to stdout.

pub mod json;
pub mod markdown;

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

/// Write `content` to `path`, or to stdout when `path` is `None`.
#[instrument(level = "info", skip(content), fields(bytes = content.len()))]
pub async fn emit(content: &str, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    match path {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, content).await?;
            info!(%path, "Wrote output file");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(content.as_bytes()).await?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}
