// ABOUTME: Markdown source handling for the deckdown application
// ABOUTME: Loads documents from local paths or remote URLs with retries

use crate::errors::{DeckError, Result};
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// A markdown document source, either a local file or a remote URL.
#[derive(Debug, Clone)]
pub struct MarkdownSource {
    pub location: String,
    pub is_remote: bool,
}

impl MarkdownSource {
    /// Create a source from a path string or URL.
    pub fn new(location: &str) -> Self {
        let is_remote = location.starts_with("http://") || location.starts_with("https://");
        Self {
            location: location.to_string(),
            is_remote,
        }
    }

    /// Get the markdown text. A fetch failure is reported here, before
    /// the conversion core ever runs.
    pub fn content(&self, timeout: Duration) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content(timeout)
        } else {
            self.read_local_content()
        }
    }

    /// Fetch the document from a URL, retrying with exponential backoff.
    fn fetch_remote_content(&self, timeout: Duration) -> Result<String> {
        let url = Url::parse(&self.location)
            .map_err(|e| DeckError::InvalidUrl(format!("{}: {}", self.location, e)))?;
        info!("Fetching markdown from {}", url);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DeckError::FetchError)?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(url.clone()).send() {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.text().map_err(DeckError::FetchError);
                    }
                    let status = response.status();
                    last_error =
                        Some(DeckError::ValidationError(format!("HTTP error: {}", status)));
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            info!(
                "Fetch attempt {} failed, retrying in {} ms",
                attempt, retry_delay
            );
            std::thread::sleep(Duration::from_millis(retry_delay));
            retry_delay *= 2;
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching markdown".to_string())
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        info!("Reading markdown from {}", self.location);
        let path = Path::new(&self.location);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }

        fs::read_to_string(path).map_err(DeckError::FileReadError)
    }
}
