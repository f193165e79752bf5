// ABOUTME: Watch module for monitoring a markdown file and regenerating the deck
// ABOUTME: Provides file watching and an optional local preview server

use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;
use tiny_http::{Header, Response, Server, StatusCode};

use crate::config::Config as AppConfig;
use crate::convert::convert_markdown;
use crate::errors::{DeckError, Result};
use crate::html::{write_html_to_file, HtmlDeck};
use crate::source::MarkdownSource;
use crate::utils;

/// Configuration for watch mode
pub struct WatchConfig {
    /// Path to the markdown file to watch
    pub markdown_path: PathBuf,

    /// Output HTML deck path
    pub html_output: PathBuf,

    /// Apply the default theme on each regeneration
    pub apply_theme: bool,

    /// Restrict parsing to the titles-and-bullets grammar
    pub minimal_grammar: bool,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the deck using a local web server
    pub serve: bool,

    /// Port for local web server
    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            markdown_path: PathBuf::new(),
            html_output: PathBuf::new(),
            apply_theme: true,
            minimal_grammar: false,
            debounce_ms: 500,
            serve: false,
            port: 8080,
        }
    }
}

/// Start a simple HTTP server to serve the generated deck
fn start_server(html_path: PathBuf, port: u16) -> Result<()> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| DeckError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    let html_dir = html_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let html_file_name = html_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let server = Arc::new(server);

    thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);
        println!("HTTP server listening on http://localhost:{}", port);

        for request in server.incoming_requests() {
            let url_path = request.url();
            let file_path = if url_path == "/" {
                html_dir.join(&html_file_name)
            } else {
                html_dir.join(url_path.trim_start_matches('/'))
            };

            debug!("Request for {:?} -> {:?}", url_path, file_path);

            if file_path.is_file() {
                match fs::read(&file_path) {
                    Ok(content) => {
                        let content_type = match file_path.extension() {
                            Some(ext) if ext.to_string_lossy() == "html" => "text/html",
                            Some(ext) if ext.to_string_lossy() == "css" => "text/css",
                            _ => "application/octet-stream",
                        };
                        let header = Header::from_bytes("Content-Type", content_type)
                            .expect("Failed to create content-type header");
                        if let Err(e) = request.respond(Response::from_data(content).with_header(header)) {
                            error!("Failed to send response: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("Failed to read file {:?}: {}", file_path, e);
                        let response = Response::from_string(format!("Failed to read file: {}", e))
                            .with_status_code(StatusCode(500));
                        let _ = request.respond(response);
                    }
                }
            } else {
                let response =
                    Response::from_string("404 Not Found").with_status_code(StatusCode(404));
                let _ = request.respond(response);
            }
        }
    });

    Ok(())
}

/// Watch a markdown file and regenerate the HTML deck on every change
pub fn watch_markdown(config: WatchConfig, app_config: &AppConfig) -> Result<()> {
    utils::validate_file_exists(&config.markdown_path)?;
    utils::ensure_parent_directory_exists(&config.html_output)?;

    // Initial generation
    regenerate_deck(&config, app_config)?;

    if config.serve {
        start_server(config.html_output.clone(), config.port)?;
    }

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    // Watch the directory so editors that replace the file are caught
    let watch_path = match config.markdown_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let abs_watch_path = if watch_path.is_absolute() {
        watch_path.to_path_buf()
    } else {
        utils::get_absolute_path(watch_path)?
    };

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::Recursive)
        .map_err(|e| {
            DeckError::WatchError(format!("Failed to watch {:?}: {}", abs_watch_path, e))
        })?;

    info!("Watching for changes in {:?}", watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let mut last_processed = std::time::Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event
                        .paths
                        .iter()
                        .any(|path| is_relevant_path(path, &config))
                });

                let now = std::time::Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_deck(&config, app_config) {
                        Ok(_) => {
                            info!("Regenerated deck successfully");
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate deck: {}", e),
                    }
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// The watched markdown file itself, or any markdown/css sibling.
fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    let path_abs = match utils::get_absolute_path(path) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let md_path_abs = match utils::get_absolute_path(&config.markdown_path) {
        Ok(p) => p,
        Err(_) => config.markdown_path.clone(),
    };

    if path_abs == md_path_abs || path == config.markdown_path {
        return true;
    }

    match path.extension() {
        Some(ext) => {
            let ext_str = ext.to_string_lossy().to_lowercase();
            ext_str == "md" || ext_str == "css"
        }
        None => false,
    }
}

/// Re-run the full conversion into a fresh deck and write it out
fn regenerate_deck(config: &WatchConfig, app_config: &AppConfig) -> Result<()> {
    info!("Regenerating deck...");

    let source = MarkdownSource::new(&config.markdown_path.to_string_lossy());
    let markdown = source.content(app_config.fetch_timeout())?;

    let mut deck = HtmlDeck::with_theme_css(app_config.theme_css.clone());
    let options = app_config.get_convert_options(true, config.apply_theme, config.minimal_grammar);
    let summary = convert_markdown(&markdown, &mut deck, &options)?;

    write_html_to_file(&deck.to_html(), &config.html_output)?;
    info!("Deck regenerated: {} -> {:?}", summary, config.html_output);

    Ok(())
}
