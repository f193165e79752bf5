// ABOUTME: Configuration module for the deckdown application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::convert::ConvertOptions;
use crate::errors::{DeckError, Result};
use crate::parser::Grammar;
use std::env;
use std::time::Duration;

/// Global configuration for the application.
pub struct Config {
    /// Stylesheet URL used when the theme flag is set; the built-in
    /// theme is used when unset.
    pub theme_css: Option<String>,
    pub fetch_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables. A timeout that is
    /// set but unparsable is an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let theme_css = env::var("DECKDOWN_THEME_CSS").ok();
        let fetch_timeout_ms = match env::var("DECKDOWN_FETCH_TIMEOUT_MS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                DeckError::ConfigError(format!(
                    "Invalid DECKDOWN_FETCH_TIMEOUT_MS value: {}",
                    value
                ))
            })?,
            Err(_) => 10000,
        };

        Ok(Self {
            theme_css,
            fetch_timeout_ms,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Get conversion options with defaults from this config.
    pub fn get_convert_options(
        &self,
        clear_existing: bool,
        apply_theme: bool,
        minimal_grammar: bool,
    ) -> ConvertOptions {
        ConvertOptions {
            clear_existing,
            apply_theme,
            grammar: if minimal_grammar {
                Grammar::titles_and_bullets()
            } else {
                Grammar::full()
            },
        }
    }
}
