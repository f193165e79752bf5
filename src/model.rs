// ABOUTME: Core data model for the deckdown application
// ABOUTME: Slide records, content blocks and inline span annotations

/// One semantic unit of slide body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(String),
    Bullet { indent: usize, text: String },
    Numbered(String),
    Quote(String),
    Code(String),
    /// Rows may be ragged; rendering tolerates shorter rows.
    Table(Vec<Vec<String>>),
}

/// A parsed slide record: title, optional subtitle, ordered content
/// blocks and newline-joined speaker notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub subtitle: String,
    pub blocks: Vec<ContentBlock>,
    pub speaker_notes: String,
}

impl Slide {
    /// A slide is kept only if it has a title or at least one content
    /// block. Subtitle-only and notes-only slides are dropped.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.blocks.is_empty()
    }
}

/// An ordered sequence of slides. In-memory only, rebuilt per conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub slides: Vec<Slide>,
}

impl Document {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Inline formatting styles supported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Bold,
    Italic,
    Code,
}

impl SpanStyle {
    /// Width in bytes of one delimiter for this style (`**` vs `*` / `` ` ``).
    pub fn marker_len(&self) -> usize {
        match self {
            SpanStyle::Bold => 2,
            SpanStyle::Italic | SpanStyle::Code => 1,
        }
    }
}

/// A (range, style) annotation over a text buffer. Byte offsets cover the
/// text between the delimiters, not the delimiters themselves. Advisory:
/// consumed by the renderer, never stored in the `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineSpan {
    pub start: usize,
    pub end: usize,
    pub style: SpanStyle,
}
