// ABOUTME: Layout selection and slide rendering for the deckdown application
// ABOUTME: Maps parsed slide records onto rendering-target templates and regions

use crate::inline::find_spans;
use crate::model::{ContentBlock, Slide};
use crate::target::{BoxPosition, Layout, RegionRef, SlideTarget, TargetSlide};
use log::{debug, warn};

const BULLET_GLYPH: &str = "\u{2022} ";
const QUOTE_GLYPH: &str = "\u{275d} ";

/// Choose a template from title and content presence. Deterministic:
/// re-running on the same slide yields the same choice.
pub fn select_layout(slide: &Slide) -> Layout {
    let has_title = !slide.title.is_empty();
    let has_content = !slide.blocks.is_empty();
    match (has_title, has_content) {
        (true, false) => Layout::SectionHeader,
        (false, false) => Layout::Blank,
        _ => Layout::TitleAndBody,
    }
}

/// Render one slide record into the target. Per-feature failures (a
/// failed span, a failed table) degrade locally and never abort the
/// slide; only an unexpected target failure propagates.
pub fn render_slide<T: SlideTarget>(record: &Slide, target: &mut T) -> crate::errors::Result<()> {
    let layout = select_layout(record);
    let mut slide = target.new_slide(layout);

    if !record.title.is_empty() && !slide.set_title(&record.title) {
        slide.add_text_box(&record.title, BoxPosition::Title);
    }

    // A subtitle fills a subtitle region only when the template has one;
    // it is never promoted to a text box.
    if !record.subtitle.is_empty() && !slide.set_subtitle(&record.subtitle) {
        debug!("Dropping subtitle with no region: {}", record.subtitle);
    }

    let body = flatten_blocks(&record.blocks);
    if !body.is_empty() {
        let region = if slide.set_body(&body) {
            RegionRef::Body
        } else {
            let position = if record.title.is_empty() {
                BoxPosition::NearTop
            } else {
                BoxPosition::BelowTitle
            };
            slide.add_text_box(&body, position)
        };
        for span in find_spans(&body) {
            if let Err(e) = slide.apply_span(region, span) {
                warn!("Skipping inline span {:?}: {}", span, e);
            }
        }
    }

    for block in &record.blocks {
        if let ContentBlock::Table(rows) = block {
            if let Err(e) = slide.add_table(rows) {
                warn!("Table insertion failed, falling back to text: {}", e);
                slide.add_text_box(&table_as_text(rows), BoxPosition::BelowTitle);
            }
        }
    }

    if !record.speaker_notes.is_empty() {
        slide.set_notes(&record.speaker_notes);
    }

    target.push_slide(slide)
}

/// Flatten all non-table blocks, in order, into one text buffer.
fn flatten_blocks(blocks: &[ContentBlock]) -> String {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text(t) | ContentBlock::Code(t) => lines.push(t.clone()),
            ContentBlock::Bullet { indent, text } => {
                lines.push(format!("{}{}{}", "  ".repeat(*indent), BULLET_GLYPH, text));
            }
            // Fixed two-space indent; native numbering is not regenerated.
            ContentBlock::Numbered(t) => lines.push(format!("  {}", t)),
            ContentBlock::Quote(t) => lines.push(format!("{}{}", QUOTE_GLYPH, t)),
            ContentBlock::Table(_) => {}
        }
    }
    lines.join("\n").trim().to_string()
}

/// The required table fallback: rows joined by " | ", one row per line.
fn table_as_text(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|r| r.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
}
