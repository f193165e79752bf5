// ABOUTME: Document orchestrator for the deckdown application
// ABOUTME: Runs the parse-then-render pipeline against a slide target

use crate::errors::Result;
use crate::layout::render_slide;
use crate::parser::{Grammar, Parser};
use crate::target::SlideTarget;
use log::info;
use std::fmt;

/// Options controlling one conversion run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Remove all existing slides before parsing.
    pub clear_existing: bool,
    /// Ask the target to apply its default theme.
    pub apply_theme: bool,
    pub grammar: Grammar,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            clear_existing: true,
            apply_theme: false,
            grammar: Grammar::full(),
        }
    }
}

/// Human-readable conversion outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub slides_created: usize,
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} slides created", self.slides_created)
    }
}

/// Convert a markdown document into slides on the target. One slide's
/// table or formatting degradation never aborts the remaining slides;
/// only an unexpected target failure propagates.
pub fn convert_markdown<T: SlideTarget>(
    markdown: &str,
    target: &mut T,
    options: &ConvertOptions,
) -> Result<ConvertSummary> {
    if options.clear_existing {
        target.clear();
    }
    if options.apply_theme {
        target.apply_theme();
    }

    let document = Parser::new(options.grammar).parse(markdown);
    let slides_created = document.slide_count();

    for record in &document.slides {
        render_slide(record, target)?;
    }

    let summary = ConvertSummary { slides_created };
    info!("{}", summary);
    Ok(summary)
}
