// ABOUTME: Library module for the deckdown program.
// ABOUTME: Contains core functionality for parsing markdown into slide decks.

// Reexport modules
pub mod classify;
pub mod config;
pub mod convert;
pub mod errors;
pub mod html;
pub mod inline;
pub mod layout;
pub mod model;
pub mod parser;
pub mod source;
pub mod target;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use convert::{convert_markdown, ConvertOptions, ConvertSummary};
pub use errors::{DeckError, Result};
pub use html::{write_html_to_file, HtmlDeck};
pub use inline::find_spans;
pub use layout::{render_slide, select_layout};
pub use model::{ContentBlock, Document, InlineSpan, Slide, SpanStyle};
pub use parser::{Grammar, Parser};
pub use source::MarkdownSource;
pub use target::{BoxPosition, Layout, RegionRef, SlideTarget, TargetSlide};
pub use watch::{watch_markdown, WatchConfig};

#[cfg(test)]
mod tests;
