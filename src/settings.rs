//! Persistent user settings.
//!
//! A flat key/value file with exactly two keys, stored as YAML:
//!
//! ```yaml
//! theme: dark
//! refresh-interval: 600
//! ```
//!
//! A missing file means defaults. Resetting deletes the file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Shortest refresh interval accepted, in seconds.
pub const MIN_REFRESH_SECS: u64 = 10;

/// Default refresh interval for the news view, in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {} is malformed: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown theme '{0}' (expected light, dark or auto)")]
    UnknownTheme(String),
    #[error("refresh interval must be at least {min} seconds, got {0}", min = MIN_REFRESH_SECS)]
    IntervalTooShort(u64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        };
        f.write_str(s)
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(SettingsError::UnknownTheme(other.to_string())),
        }
    }
}

fn default_refresh() -> u64 {
    DEFAULT_REFRESH_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    /// Seconds between refreshes in watch mode.
    #[serde(rename = "refresh-interval", default = "default_refresh")]
    pub refresh_interval: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            refresh_interval: DEFAULT_REFRESH_SECS,
        }
    }
}

impl Settings {
    pub fn set_refresh_interval(&mut self, secs: u64) -> Result<(), SettingsError> {
        if secs < MIN_REFRESH_SECS {
            return Err(SettingsError::IntervalTooShort(secs));
        }
        self.refresh_interval = secs;
        Ok(())
    }
}

/// Settings persisted at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the settings, falling back to defaults when the file is absent.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file; using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Settings::default());
        }

        let settings: Settings =
            serde_yaml::from_str(&raw).map_err(|source| SettingsError::Format {
                path: self.path.clone(),
                source,
            })?;
        if settings.refresh_interval < MIN_REFRESH_SECS {
            return Err(SettingsError::IntervalTooShort(settings.refresh_interval));
        }
        Ok(settings)
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let yaml = serde_yaml::to_string(settings).map_err(|source| SettingsError::Format {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }
        fs::write(&self.path, yaml).await.map_err(|e| self.io_err(e))?;
        info!(theme = %settings.theme, refresh_interval = settings.refresh_interval, "Saved settings");
        Ok(())
    }

    /// Drop both keys so the next load yields defaults.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn reset(&self) -> Result<(), SettingsError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Settings reset");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
