// ABOUTME: Block parser for the deckdown application
// ABOUTME: State machine turning classified lines into an ordered slide document

use crate::classify::{self, LineKind};
use crate::model::{ContentBlock, Document, Slide};
use log::debug;

/// Which line-level constructs the parser honors. Lines for a disabled
/// construct fall through to the plain-text rule, so a minimal
/// titles-and-bullets deck and a full deck share one parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub tables: bool,
    pub code: bool,
    pub quotes: bool,
    pub notes: bool,
}

impl Grammar {
    /// The full supported subset.
    pub fn full() -> Self {
        Self {
            tables: true,
            code: true,
            quotes: true,
            notes: true,
        }
    }

    /// Headings, bullets and plain text only.
    pub fn titles_and_bullets() -> Self {
        Self {
            tables: false,
            code: false,
            quotes: false,
            notes: false,
        }
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::full()
    }
}

/// Block-level parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Code,
    Table,
}

pub struct Parser {
    grammar: Grammar,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// Parse a full markdown document into slide records. The parser is
    /// total: malformed input degrades through boundary or end-of-input
    /// flushes, never through an error.
    pub fn parse(&self, text: &str) -> Document {
        let lines: Vec<&str> = text.lines().collect();
        let mut state = ParseState::default();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            // Inside a fence every line is verbatim, including ones that
            // would otherwise match other rules.
            if state.mode == Mode::Code {
                if line.trim_start().starts_with("```") {
                    state.close_code();
                } else {
                    state.code_buffer.push(line.to_string());
                }
                i += 1;
                continue;
            }

            let kind = self.gate(line, classify::classify(line));

            // First non-table line closes the table, then the line is
            // re-evaluated against the remaining rules.
            if state.mode == Mode::Table && !matches!(kind, LineKind::TableRow(_)) {
                state.close_table();
            }

            match kind {
                LineKind::Fence => {
                    state.mode = Mode::Code;
                }
                LineKind::TableRow(row) => {
                    state.mode = Mode::Table;
                    if !classify::is_table_separator(row) {
                        state.table_buffer.push(split_table_row(row));
                    }
                }
                LineKind::Heading(title) => {
                    state.finish_slide();
                    state.current = Some(Slide {
                        title,
                        ..Slide::default()
                    });
                }
                LineKind::Rule => {
                    state.finish_slide();
                    state.current = Some(Slide::default());
                }
                LineKind::BoldOnly(inner) => {
                    let slide = state.ensure_slide();
                    if slide.blocks.is_empty() {
                        slide.subtitle = inner.to_string();
                    } else {
                        slide.blocks.push(ContentBlock::Text(line.trim().to_string()));
                    }
                }
                LineKind::NotesMarker => {
                    i = self.capture_notes(&lines, i + 1, &mut state);
                    continue;
                }
                LineKind::Quote(text) => {
                    if !text.is_empty() {
                        state
                            .ensure_slide()
                            .blocks
                            .push(ContentBlock::Quote(text.to_string()));
                    }
                }
                LineKind::Bullet { indent, text } => {
                    state.ensure_slide().blocks.push(ContentBlock::Bullet {
                        indent,
                        text: text.to_string(),
                    });
                }
                LineKind::Numbered(text) => {
                    state
                        .ensure_slide()
                        .blocks
                        .push(ContentBlock::Numbered(text.to_string()));
                }
                LineKind::Blank => {}
                LineKind::Text(text) => {
                    if !is_rule_fragment(text) {
                        state
                            .ensure_slide()
                            .blocks
                            .push(ContentBlock::Text(text.to_string()));
                    }
                }
            }
            i += 1;
        }

        state.flush();
        debug!("Parsed {} slide(s)", state.document.slide_count());
        state.document
    }

    /// Demote tokens for constructs the grammar disables; the demoted
    /// line is kept as plain text.
    fn gate<'a>(&self, line: &'a str, kind: LineKind<'a>) -> LineKind<'a> {
        let demote = match kind {
            LineKind::TableRow(_) => !self.grammar.tables,
            LineKind::Fence => !self.grammar.code,
            LineKind::Quote(_) => !self.grammar.quotes,
            LineKind::NotesMarker => !self.grammar.notes,
            _ => false,
        };
        if demote {
            LineKind::Text(line.trim())
        } else {
            kind
        }
    }

    /// Consume lines following a notes marker until the next slide
    /// boundary or end of input. The terminating boundary line is left
    /// for the main loop to re-evaluate. Returns the next cursor index.
    fn capture_notes(&self, lines: &[&str], start: usize, state: &mut ParseState) -> usize {
        let mut captured = Vec::new();
        let mut i = start;
        while i < lines.len() {
            if classify::is_boundary(&classify::classify(lines[i])) {
                break;
            }
            let stripped = classify::strip_list_marker(lines[i]);
            if !stripped.is_empty() {
                captured.push(stripped.to_string());
            }
            i += 1;
        }
        if !captured.is_empty() {
            let slide = state.ensure_slide();
            if !slide.speaker_notes.is_empty() {
                slide.speaker_notes.push('\n');
            }
            slide.speaker_notes.push_str(&captured.join("\n"));
        }
        i
    }
}

#[derive(Default)]
struct ParseState {
    mode: Mode,
    current: Option<Slide>,
    code_buffer: Vec<String>,
    table_buffer: Vec<Vec<String>>,
    document: Document,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

impl ParseState {
    /// Content with no open slide implicitly opens an untitled one.
    fn ensure_slide(&mut self) -> &mut Slide {
        self.current.get_or_insert_with(Slide::default)
    }

    /// Close a fence. The buffered lines become one code block on the
    /// current slide; without an open slide the buffer is dropped.
    fn close_code(&mut self) {
        self.mode = Mode::Normal;
        let body = self.code_buffer.join("\n");
        self.code_buffer.clear();
        match self.current.as_mut() {
            Some(slide) => slide.blocks.push(ContentBlock::Code(body)),
            None => debug!("Dropping code block with no open slide"),
        }
    }

    fn close_table(&mut self) {
        self.mode = Mode::Normal;
        if !self.table_buffer.is_empty() {
            let rows = std::mem::take(&mut self.table_buffer);
            self.ensure_slide().blocks.push(ContentBlock::Table(rows));
        }
    }

    /// Close any open table, then push the current slide if non-empty.
    fn finish_slide(&mut self) {
        if self.mode == Mode::Table {
            self.close_table();
        }
        if let Some(slide) = self.current.take() {
            if !slide.is_empty() {
                self.document.slides.push(slide);
            }
        }
    }

    /// End of input: flush open buffers, then the final slide.
    fn flush(&mut self) {
        if self.mode == Mode::Code {
            self.close_code();
        }
        self.finish_slide();
    }
}

/// Split a pipe-delimited row into trimmed cells, dropping empty outer
/// cells produced by the leading and trailing pipes.
fn split_table_row(row: &str) -> Vec<String> {
    let mut cells: Vec<String> = row.split('|').map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Leftover rule fragments (one or two rule characters alone on a line)
/// are dropped rather than kept as text.
fn is_rule_fragment(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '-' | '_' | '*'))
}
