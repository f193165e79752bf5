// ABOUTME: Rendering target abstraction for the deckdown application
// ABOUTME: Trait seam over the hosting presentation environment's primitives

use crate::errors::Result;
use crate::model::InlineSpan;

/// Slide templates the layout selector chooses among.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Title present, no body content.
    SectionHeader,
    /// Neither title nor content.
    Blank,
    /// Title plus a body region.
    TitleAndBody,
}

/// Position hints for text boxes the renderer creates when a template
/// region cannot be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxPosition {
    /// Fixed-position, large bold region standing in for a title.
    Title,
    BelowTitle,
    NearTop,
}

/// Addresses the region that received a piece of text, so inline spans
/// can be applied to it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionRef {
    Title,
    Subtitle,
    Body,
    /// A text box created by the renderer, by creation index.
    Extra(usize),
}

/// A deck under construction in the hosting environment.
pub trait SlideTarget {
    type Slide: TargetSlide;

    fn new_slide(&mut self, layout: Layout) -> Self::Slide;

    fn push_slide(&mut self, slide: Self::Slide) -> Result<()>;

    /// Remove all existing slides.
    fn clear(&mut self);

    /// Apply the target's default theme. A no-op for targets without one.
    fn apply_theme(&mut self);

    fn slide_count(&self) -> usize;
}

/// One slide in the target. The `set_*` region methods return `false`
/// when the template has no such placeholder; the renderer then decides
/// whether to create a text box or drop the text.
pub trait TargetSlide {
    fn set_title(&mut self, text: &str) -> bool;

    fn set_subtitle(&mut self, text: &str) -> bool;

    fn set_body(&mut self, text: &str) -> bool;

    /// Create a free text box and return a handle to its region.
    fn add_text_box(&mut self, text: &str, position: BoxPosition) -> RegionRef;

    /// Insert a grid sized to the captured rows. May fail; the renderer
    /// degrades a failed table to plain text.
    fn add_table(&mut self, rows: &[Vec<String>]) -> Result<()>;

    fn set_notes(&mut self, text: &str);

    /// Apply one inline span to a region's text. A failure (stale or
    /// out-of-range offsets) is reported, not fatal.
    fn apply_span(&mut self, region: RegionRef, span: InlineSpan) -> Result<()>;
}
