//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use crate::constants::timing::DEFAULT_POLL_MS;
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Deck file to present
    pub deck_path: PathBuf,
    /// Directory holding `heatmap_data.json` and `dendro_data.json`
    pub data_dir: PathBuf,
    /// Starting slide number (1-indexed), overriding the deck's own
    pub start_slide: Option<usize>,
    /// Timed slide number (1-indexed), overriding the deck's own
    pub timed_slide: Option<usize>,
    /// Directory for the log file
    pub log_dir: Option<PathBuf>,
    /// Terminal event poll interval in milliseconds
    pub poll_ms: u64,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            deck_path: PathBuf::from("demos/deck.json"),
            data_dir: PathBuf::from("demos/data"),
            start_slide: None,
            timed_slide: None,
            log_dir: None,
            poll_ms: DEFAULT_POLL_MS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(path) = env::var("VIZDECK_DECK") {
            config.deck_path = expand_path(&path);
        }

        if let Ok(path) = env::var("VIZDECK_DATA_DIR") {
            config.data_dir = expand_path(&path);
        }

        if let Ok(value) = env::var("VIZDECK_START_SLIDE") {
            config.start_slide = Some(parse_slide_number("VIZDECK_START_SLIDE", &value)?);
        }

        if let Ok(value) = env::var("VIZDECK_TIMED_SLIDE") {
            config.timed_slide = Some(parse_slide_number("VIZDECK_TIMED_SLIDE", &value)?);
        }

        // Log dir: env var override, or the platform data directory
        config.log_dir = env::var("VIZDECK_LOG_DIR").ok().map_or_else(
            || dirs::data_local_dir().map(|d| d.join("vizdeck")),
            |path| Some(expand_path(&path)),
        );

        // Poll interval can be tuned for slow terminals
        if let Ok(ms) = env::var("VIZDECK_TICK_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.poll_ms = ms.max(1);
            }
        }

        Ok(config)
    }

    /// Replace the deck path (first command-line argument).
    #[must_use]
    pub fn with_deck_path(mut self, path: &str) -> Self {
        self.deck_path = expand_path(path);
        self
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

fn parse_slide_number(var: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::config(
            format!("{var}={value} is not a slide number"),
            "Slide numbers start at 1",
        )),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn defaults_point_at_demo_assets() {
        let config = Config::default();
        assert_eq!(config.deck_path, PathBuf::from("demos/deck.json"));
        assert_eq!(config.data_dir, PathBuf::from("demos/data"));
        assert_eq!(config.poll_ms, DEFAULT_POLL_MS);
        assert_eq!(config.app_name(), "vizdeck");
    }

    #[test]
    fn slide_numbers_are_one_indexed() {
        assert_eq!(parse_slide_number("X", " 3 ").unwrap(), 3);
        assert!(parse_slide_number("X", "0").is_err());
        assert!(parse_slide_number("X", "three").is_err());
    }

    #[test]
    fn deck_path_override() {
        let config = Config::default().with_deck_path("talks/intro.json");
        assert_eq!(config.deck_path, PathBuf::from("talks/intro.json"));
    }
}
