// ABOUTME: HTML deck target for the deckdown application
// ABOUTME: Implements the rendering-target seam and serializes slides to HTML

use crate::errors::{DeckError, Result};
use crate::model::{InlineSpan, SpanStyle};
use crate::target::{BoxPosition, Layout, RegionRef, SlideTarget, TargetSlide};
use log::info;
use std::fs;
use std::path::Path;

const BOLD: u8 = 1;
const ITALIC: u8 = 2;
const CODE: u8 = 4;

/// Minimal built-in deck styling, used when no theme stylesheet URL is
/// configured. Covers the fixed attribute set: bold, italic, and
/// monospace-with-background for code.
const DEFAULT_THEME: &str = "\
.slide { page-break-after: always; padding: 2em; }\n\
.slide h1 { font-size: 2.5em; }\n\
.slide h2 { color: #555; font-weight: normal; }\n\
.slide .textbox.title { font-size: 2.5em; font-weight: bold; }\n\
.slide code { font-family: monospace; background: #eee; }\n\
.slide table { border-collapse: collapse; }\n\
.slide td, .slide th { border: 1px solid #999; padding: 0.3em 0.6em; }\n\
.slide .notes { color: #888; font-size: 0.8em; border-top: 1px dashed #ccc; }\n";

/// A text region's content plus the inline spans applied to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPayload {
    pub text: String,
    pub spans: Vec<InlineSpan>,
}

impl TextPayload {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }
}

/// One rendered slide in the HTML deck. Which placeholder regions exist
/// depends on the layout, mirroring a template-driven slide host.
#[derive(Debug, Clone)]
pub struct HtmlSlide {
    pub layout: Layout,
    pub title: Option<TextPayload>,
    pub subtitle: Option<String>,
    pub body: Option<TextPayload>,
    pub text_boxes: Vec<(BoxPosition, TextPayload)>,
    pub tables: Vec<Vec<Vec<String>>>,
    pub notes: Option<String>,
}

impl HtmlSlide {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            title: None,
            subtitle: None,
            body: None,
            text_boxes: Vec::new(),
            tables: Vec::new(),
            notes: None,
        }
    }

    fn payload_mut(&mut self, region: RegionRef) -> Option<&mut TextPayload> {
        match region {
            RegionRef::Title => self.title.as_mut(),
            RegionRef::Body => self.body.as_mut(),
            RegionRef::Extra(i) => self.text_boxes.get_mut(i).map(|(_, p)| p),
            RegionRef::Subtitle => None,
        }
    }
}

impl TargetSlide for HtmlSlide {
    fn set_title(&mut self, text: &str) -> bool {
        match self.layout {
            Layout::SectionHeader | Layout::TitleAndBody => {
                self.title = Some(TextPayload::new(text));
                true
            }
            Layout::Blank => false,
        }
    }

    fn set_subtitle(&mut self, text: &str) -> bool {
        // Only the section-header template carries a subtitle placeholder.
        if self.layout == Layout::SectionHeader {
            self.subtitle = Some(text.to_string());
            true
        } else {
            false
        }
    }

    fn set_body(&mut self, text: &str) -> bool {
        if self.layout == Layout::TitleAndBody {
            self.body = Some(TextPayload::new(text));
            true
        } else {
            false
        }
    }

    fn add_text_box(&mut self, text: &str, position: BoxPosition) -> RegionRef {
        self.text_boxes.push((position, TextPayload::new(text)));
        RegionRef::Extra(self.text_boxes.len() - 1)
    }

    fn add_table(&mut self, rows: &[Vec<String>]) -> Result<()> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(DeckError::RenderError(
                "cannot build a table with no cells".to_string(),
            ));
        }
        self.tables.push(rows.to_vec());
        Ok(())
    }

    fn set_notes(&mut self, text: &str) {
        self.notes = Some(text.to_string());
    }

    fn apply_span(&mut self, region: RegionRef, span: InlineSpan) -> Result<()> {
        let payload = self
            .payload_mut(region)
            .ok_or_else(|| DeckError::RenderError(format!("no such region: {:?}", region)))?;
        if span.start > span.end || span.end > payload.text.len() {
            return Err(DeckError::RenderError(format!(
                "span {}..{} outside text of length {}",
                span.start,
                span.end,
                payload.text.len()
            )));
        }
        payload.spans.push(span);
        Ok(())
    }
}

/// An HTML document standing in for the hosting presentation
/// environment: slides accumulate in order and serialize to one page.
#[derive(Debug, Default)]
pub struct HtmlDeck {
    pub slides: Vec<HtmlSlide>,
    themed: bool,
    theme_css: Option<String>,
}

impl HtmlDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a stylesheet URL instead of the built-in theme when the
    /// theme flag is set.
    pub fn with_theme_css(theme_css: Option<String>) -> Self {
        Self {
            theme_css,
            ..Self::default()
        }
    }

    /// Serialize the deck to a complete HTML document.
    pub fn to_html(&self) -> String {
        let title = self
            .slides
            .iter()
            .find_map(|s| s.title.as_ref())
            .map(|t| t.text.as_str())
            .unwrap_or("Presentation");

        let mut doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        doc.push_str("<meta charset=\"UTF-8\">\n");
        doc.push_str("<meta name=\"generator\" content=\"deckdown\">\n");
        doc.push_str(&format!(
            "<!-- generated {} -->\n",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        ));
        doc.push_str(&format!(
            "<title>{}</title>\n",
            html_escape::encode_text(title)
        ));
        if self.themed {
            match &self.theme_css {
                Some(url) => {
                    doc.push_str(&format!(r#"<link rel="stylesheet" href="{}">"#, url));
                    doc.push('\n');
                }
                None => doc.push_str(&format!("<style>\n{}</style>\n", DEFAULT_THEME)),
            }
        }
        doc.push_str("</head>\n<body>\n");

        for slide in &self.slides {
            doc.push_str("<div class=\"slide\">\n");
            write_slide(&mut doc, slide);
            doc.push_str("</div>\n");
        }

        doc.push_str("</body>\n</html>");
        doc
    }
}

impl SlideTarget for HtmlDeck {
    type Slide = HtmlSlide;

    fn new_slide(&mut self, layout: Layout) -> HtmlSlide {
        HtmlSlide::new(layout)
    }

    fn push_slide(&mut self, slide: HtmlSlide) -> Result<()> {
        self.slides.push(slide);
        Ok(())
    }

    fn clear(&mut self) {
        self.slides.clear();
    }

    fn apply_theme(&mut self) {
        self.themed = true;
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

fn write_slide(doc: &mut String, slide: &HtmlSlide) {
    if let Some(title) = &slide.title {
        doc.push_str(&format!(
            "<h1>{}</h1>\n",
            html_escape::encode_text(&title.text)
        ));
    }
    if let Some(subtitle) = &slide.subtitle {
        doc.push_str(&format!(
            "<h2>{}</h2>\n",
            html_escape::encode_text(subtitle)
        ));
    }
    if let Some(body) = &slide.body {
        doc.push_str("<div class=\"body\">");
        doc.push_str(&spans_to_html(&body.text, &body.spans));
        doc.push_str("</div>\n");
    }
    for table in &slide.tables {
        write_table(doc, table);
    }
    for (position, payload) in &slide.text_boxes {
        let class = match position {
            BoxPosition::Title => "textbox title",
            BoxPosition::BelowTitle => "textbox below-title",
            BoxPosition::NearTop => "textbox near-top",
        };
        doc.push_str(&format!("<div class=\"{}\">", class));
        doc.push_str(&spans_to_html(&payload.text, &payload.spans));
        doc.push_str("</div>\n");
    }
    if let Some(notes) = &slide.notes {
        doc.push_str(&format!(
            "<aside class=\"notes\">{}</aside>\n",
            html_escape::encode_text(notes).replace('\n', "<br>")
        ));
    }
}

/// A grid sized to the captured dimensions: the header row is bold,
/// shorter rows are padded with empty cells.
fn write_table(doc: &mut String, rows: &[Vec<String>]) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    doc.push_str("<table>\n");
    for (r, row) in rows.iter().enumerate() {
        let tag = if r == 0 { "th" } else { "td" };
        doc.push_str("<tr>");
        for c in 0..columns {
            let cell = row.get(c).map(String::as_str).unwrap_or("");
            doc.push_str(&format!(
                "<{tag}>{}</{tag}>",
                html_escape::encode_text(cell)
            ));
        }
        doc.push_str("</tr>\n");
    }
    doc.push_str("</table>\n");
}

/// Render a text buffer with advisory spans as HTML. Marker characters
/// adjacent to a span are elided; overlapping spans merge their styles.
fn spans_to_html(text: &str, spans: &[InlineSpan]) -> String {
    let len = text.len();
    let mut styles = vec![0u8; len];
    let mut skip = vec![false; len];

    for span in spans {
        if span.start > span.end || span.end > len {
            continue;
        }
        let bit = match span.style {
            SpanStyle::Bold => BOLD,
            SpanStyle::Italic => ITALIC,
            SpanStyle::Code => CODE,
        };
        for flag in &mut styles[span.start..span.end] {
            *flag |= bit;
        }
        let marker = span.style.marker_len();
        for flag in &mut skip[span.start.saturating_sub(marker)..span.start] {
            *flag = true;
        }
        let marker_end = (span.end + marker).min(len);
        for flag in &mut skip[span.end..marker_end] {
            *flag = true;
        }
        // A bold pair inside a triple-asterisk run leaves one residual
        // asterisk on each side of the markers; swallow those too.
        if span.style == SpanStyle::Bold {
            let bytes = text.as_bytes();
            if bytes.get(span.start) == Some(&b'*') {
                skip[span.start] = true;
            }
            if bytes.get(marker_end) == Some(&b'*') {
                skip[marker_end] = true;
            }
        }
    }

    let mut out = String::new();
    let mut open: u8 = 0;
    let mut run = String::new();
    for (i, ch) in text.char_indices() {
        if skip[i] {
            continue;
        }
        if styles[i] != open {
            flush_run(&mut out, &mut run);
            write_tags(&mut out, open, styles[i]);
            open = styles[i];
        }
        run.push(ch);
    }
    flush_run(&mut out, &mut run);
    write_tags(&mut out, open, 0);
    out
}

fn flush_run(out: &mut String, run: &mut String) {
    if run.is_empty() {
        return;
    }
    let escaped = html_escape::encode_text(run.as_str()).replace('\n', "<br>");
    out.push_str(&escaped);
    run.clear();
}

/// Close and open tags to move between style sets. Tags always nest in
/// a fixed strong/em/code order, so the output stays well-formed.
fn write_tags(out: &mut String, from: u8, to: u8) {
    if from == to {
        return;
    }
    for (bit, tag) in [(CODE, "code"), (ITALIC, "em"), (BOLD, "strong")] {
        if from & bit != 0 {
            out.push_str(&format!("</{}>", tag));
        }
    }
    for (bit, tag) in [(BOLD, "strong"), (ITALIC, "em"), (CODE, "code")] {
        if to & bit != 0 {
            out.push_str(&format!("<{}>", tag));
        }
    }
}

/// Utility function to write a rendered deck to a file.
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(DeckError::FileReadError)?;
        }
    }

    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;

    Ok(())
}
