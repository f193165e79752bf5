use super::*;
use crate::target::{BoxPosition, Layout, RegionRef, TargetSlide};

fn parse_full(markdown: &str) -> Document {
    Parser::new(Grammar::full()).parse(markdown)
}

fn convert_to_deck(markdown: &str, options: &ConvertOptions) -> HtmlDeck {
    let mut deck = HtmlDeck::new();
    convert_markdown(markdown, &mut deck, options).expect("conversion failed");
    deck
}

#[test]
fn test_empty_input_yields_no_slides() {
    let document = parse_full("");
    assert_eq!(document.slide_count(), 0);
}

#[test]
fn test_heading_and_bullets() {
    let document = parse_full("## Title\n- a\n- b");
    assert_eq!(document.slide_count(), 1);

    let slide = &document.slides[0];
    assert_eq!(slide.title, "Title");
    assert_eq!(
        slide.blocks,
        vec![
            ContentBlock::Bullet {
                indent: 0,
                text: "a".to_string()
            },
            ContentBlock::Bullet {
                indent: 0,
                text: "b".to_string()
            },
        ]
    );
}

#[test]
fn test_bullet_indent_levels() {
    let document = parse_full("# T\n- top\n    - nested");
    let slide = &document.slides[0];
    assert_eq!(
        slide.blocks,
        vec![
            ContentBlock::Bullet {
                indent: 0,
                text: "top".to_string()
            },
            ContentBlock::Bullet {
                indent: 2,
                text: "nested".to_string()
            },
        ]
    );
}

#[test]
fn test_fenced_code_block() {
    let document = parse_full("# Head\n```\ncode line 1\ncode line 2\n```");
    let slide = &document.slides[0];
    assert_eq!(
        slide.blocks,
        vec![ContentBlock::Code(
            "code line 1\ncode line 2".to_string()
        )]
    );
}

#[test]
fn test_code_block_swallows_other_rules() {
    let document = parse_full("# Head\n```\n# not a heading\n- not a bullet\n```");
    assert_eq!(document.slide_count(), 1);
    assert_eq!(
        document.slides[0].blocks,
        vec![ContentBlock::Code(
            "# not a heading\n- not a bullet".to_string()
        )]
    );
}

#[test]
fn test_unterminated_fence_flushes_at_end_of_input() {
    let document = parse_full("# Head\n```\ndangling");
    assert_eq!(
        document.slides[0].blocks,
        vec![ContentBlock::Code("dangling".to_string())]
    );
}

#[test]
fn test_code_block_with_no_open_slide_is_dropped() {
    let document = parse_full("```\ncode\n```");
    assert_eq!(document.slide_count(), 0);
}

#[test]
fn test_pipe_table_with_separator() {
    let document = parse_full("# T\n| A | B |\n|---|---|\n| 1 | 2 |");
    let slide = &document.slides[0];
    assert_eq!(
        slide.blocks,
        vec![ContentBlock::Table(vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["1".to_string(), "2".to_string()],
        ])]
    );
}

#[test]
fn test_table_closed_by_following_text() {
    let document = parse_full("| A |\n| 1 |\nafterwards");
    let slide = &document.slides[0];
    assert_eq!(
        slide.blocks,
        vec![
            ContentBlock::Table(vec![vec!["A".to_string()], vec!["1".to_string()]]),
            ContentBlock::Text("afterwards".to_string()),
        ]
    );
}

#[test]
fn test_subtitle_captured_before_content_only() {
    let document = parse_full("# T\n**Subtitle**\nbody text");
    let slide = &document.slides[0];
    assert_eq!(slide.subtitle, "Subtitle");
    assert_eq!(slide.blocks, vec![ContentBlock::Text("body text".to_string())]);

    let document = parse_full("# T\nbody text\n**Subtitle**");
    let slide = &document.slides[0];
    assert_eq!(slide.subtitle, "");
    assert_eq!(
        slide.blocks,
        vec![
            ContentBlock::Text("body text".to_string()),
            ContentBlock::Text("**Subtitle**".to_string()),
        ]
    );
}

#[test]
fn test_speaker_notes_capture_stops_at_boundary() {
    let document = parse_full("# T\nSpeaker Notes:\n- first point\n- second point\n# Next\nhello");
    assert_eq!(document.slide_count(), 2);

    let first = &document.slides[0];
    assert_eq!(first.speaker_notes, "first point\nsecond point");

    let second = &document.slides[1];
    assert_eq!(second.title, "Next");
    assert_eq!(second.blocks, vec![ContentBlock::Text("hello".to_string())]);
}

#[test]
fn test_speaker_notes_discard_blanks_and_run_to_end_of_input() {
    let document = parse_full("# T\nspeaker notes:\nline one\n\nline two");
    assert_eq!(document.slides[0].speaker_notes, "line one\nline two");
}

#[test]
fn test_lone_rule_yields_zero_slides() {
    let document = parse_full("---");
    assert_eq!(document.slide_count(), 0);
}

#[test]
fn test_rule_creates_titleless_slide_break() {
    let document = parse_full("first half\n---\nsecond half");
    assert_eq!(document.slide_count(), 2);
    assert_eq!(document.slides[0].title, "");
    assert_eq!(document.slides[1].title, "");
    assert_eq!(
        document.slides[1].blocks,
        vec![ContentBlock::Text("second half".to_string())]
    );
}

#[test]
fn test_slide_label_stripped_from_heading() {
    let document = parse_full("## SLIDE 2: Introduction\ncontent");
    assert_eq!(document.slides[0].title, "Introduction");
}

#[test]
fn test_quote_and_numbered_blocks() {
    let document = parse_full("# T\n> wise words\n1. first\n2. second\n> ");
    assert_eq!(
        document.slides[0].blocks,
        vec![
            ContentBlock::Quote("wise words".to_string()),
            ContentBlock::Numbered("first".to_string()),
            ContentBlock::Numbered("second".to_string()),
        ]
    );
}

#[test]
fn test_minimal_grammar_demotes_tables_and_code() {
    let document = Parser::new(Grammar::titles_and_bullets()).parse("# T\n| a | b |\n```");
    assert_eq!(
        document.slides[0].blocks,
        vec![
            ContentBlock::Text("| a | b |".to_string()),
            ContentBlock::Text("```".to_string()),
        ]
    );
}

#[test]
fn test_layout_selection_is_deterministic() {
    let slide = Slide {
        title: "T".to_string(),
        ..Slide::default()
    };
    assert_eq!(select_layout(&slide), Layout::SectionHeader);
    assert_eq!(select_layout(&slide), Layout::SectionHeader);

    let blank = Slide::default();
    assert_eq!(select_layout(&blank), Layout::Blank);

    let full = Slide {
        title: "T".to_string(),
        blocks: vec![ContentBlock::Text("x".to_string())],
        ..Slide::default()
    };
    assert_eq!(select_layout(&full), Layout::TitleAndBody);
    let titleless = Slide {
        blocks: vec![ContentBlock::Text("x".to_string())],
        ..Slide::default()
    };
    assert_eq!(select_layout(&titleless), Layout::TitleAndBody);
}

#[test]
fn test_bold_spans() {
    let spans = find_spans("**bold** and *it*");
    assert!(spans.contains(&InlineSpan {
        start: 2,
        end: 6,
        style: SpanStyle::Bold
    }));
    assert!(spans.contains(&InlineSpan {
        start: 14,
        end: 16,
        style: SpanStyle::Italic
    }));
}

#[test]
fn test_italic_does_not_consume_bold_markers() {
    let spans = find_spans("***word***");
    assert!(spans.iter().all(|s| s.style != SpanStyle::Italic));
    assert_eq!(
        spans,
        vec![InlineSpan {
            start: 2,
            end: 7,
            style: SpanStyle::Bold
        }]
    );
}

#[test]
fn test_code_spans() {
    let spans = find_spans("run `cargo build` now");
    assert_eq!(
        spans,
        vec![InlineSpan {
            start: 5,
            end: 16,
            style: SpanStyle::Code
        }]
    );
}

#[test]
fn test_unpaired_markers_yield_no_spans() {
    assert!(find_spans("a * lone star and `tick").is_empty());
}

#[test]
fn test_deck_renders_bold_body_text() {
    let deck = convert_to_deck("# T\nthis is **important** stuff", &ConvertOptions::default());
    let html = deck.to_html();
    assert!(html.contains("<h1>T</h1>"));
    assert!(html.contains("this is <strong>important</strong> stuff"));
    assert!(!html.contains("**"));
}

#[test]
fn test_triple_asterisks_leave_no_residual_markers() {
    let deck = convert_to_deck("# T\nsay ***word*** here", &ConvertOptions::default());
    let html = deck.to_html();
    assert!(html.contains("say <strong>word</strong> here"));
}

#[test]
fn test_subtitle_dropped_without_region() {
    // Title+body template has no subtitle placeholder
    let deck = convert_to_deck("# T\n**Sub**\nbody", &ConvertOptions::default());
    assert_eq!(deck.slides[0].subtitle, None);

    // The section-header template keeps it
    let deck = convert_to_deck("# T\n**Sub**", &ConvertOptions::default());
    assert_eq!(deck.slides[0].subtitle.as_deref(), Some("Sub"));
}

#[test]
fn test_body_flattening_prefixes() {
    let deck = convert_to_deck(
        "# T\n- point\n1. step\n> quoted",
        &ConvertOptions::default(),
    );
    let body = deck.slides[0].body.as_ref().expect("body region filled");
    assert_eq!(body.text, "\u{2022} point\n  step\n\u{275d} quoted");
}

#[test]
fn test_titleless_slide_fills_body_region() {
    let deck = convert_to_deck("just some text", &ConvertOptions::default());
    let slide = &deck.slides[0];
    assert_eq!(slide.layout, Layout::TitleAndBody);
    assert_eq!(slide.title, None);
    assert_eq!(
        slide.body.as_ref().map(|b| b.text.as_str()),
        Some("just some text")
    );
}

#[test]
fn test_ragged_table_renders_padded_grid() {
    let deck = convert_to_deck("# T\n| A | B |\n| 1 |", &ConvertOptions::default());
    let html = deck.to_html();
    assert!(html.contains("<th>A</th><th>B</th>"));
    assert!(html.contains("<td>1</td><td></td>"));
}

#[test]
fn test_notes_rendered_into_notes_region() {
    let deck = convert_to_deck(
        "# T\nbody\nSpeaker Notes:\nremember this",
        &ConvertOptions::default(),
    );
    assert_eq!(deck.slides[0].notes.as_deref(), Some("remember this"));
}

#[test]
fn test_clear_flag_controls_existing_slides() {
    let mut deck = HtmlDeck::new();
    convert_markdown("# One", &mut deck, &ConvertOptions::default()).unwrap();
    assert_eq!(deck.slide_count(), 1);

    let keep = ConvertOptions {
        clear_existing: false,
        ..ConvertOptions::default()
    };
    let summary = convert_markdown("# Two\n# Three", &mut deck, &keep).unwrap();
    assert_eq!(summary.slides_created, 2);
    assert_eq!(deck.slide_count(), 3);

    let summary = convert_markdown("# Only", &mut deck, &ConvertOptions::default()).unwrap();
    assert_eq!(summary.slides_created, 1);
    assert_eq!(deck.slide_count(), 1);
}

#[test]
fn test_summary_display() {
    let summary = ConvertSummary { slides_created: 4 };
    assert_eq!(summary.to_string(), "4 slides created");
}

#[test]
fn test_config_fetch_timeout_from_env() {
    // Valid, invalid, and unset values exercised in one test so the
    // variable is never mutated concurrently.
    std::env::set_var("DECKDOWN_FETCH_TIMEOUT_MS", "250");
    let config = Config::from_env().unwrap();
    assert_eq!(config.fetch_timeout_ms, 250);

    std::env::set_var("DECKDOWN_FETCH_TIMEOUT_MS", "not-a-number");
    assert!(matches!(
        Config::from_env(),
        Err(DeckError::ConfigError(_))
    ));

    std::env::remove_var("DECKDOWN_FETCH_TIMEOUT_MS");
    assert_eq!(Config::from_env().unwrap().fetch_timeout_ms, 10000);
}

#[test]
fn test_stale_span_is_rejected_not_fatal() {
    let mut deck = HtmlDeck::new();
    let mut slide = deck.new_slide(Layout::TitleAndBody);
    assert!(slide.set_body("short"));
    let stale = InlineSpan {
        start: 2,
        end: 99,
        style: SpanStyle::Bold,
    };
    assert!(slide.apply_span(RegionRef::Body, stale).is_err());
    deck.push_slide(slide).unwrap();
    assert_eq!(deck.slide_count(), 1);
}

// A target whose templates carry no body placeholder and whose table
// insertion always fails, to exercise both degradation paths.
struct BareSlide {
    inner: html::HtmlSlide,
}

struct BareDeck {
    inner: HtmlDeck,
}

impl TargetSlide for BareSlide {
    fn set_title(&mut self, text: &str) -> bool {
        self.inner.set_title(text)
    }
    fn set_subtitle(&mut self, text: &str) -> bool {
        self.inner.set_subtitle(text)
    }
    fn set_body(&mut self, _text: &str) -> bool {
        false
    }
    fn add_text_box(&mut self, text: &str, position: BoxPosition) -> RegionRef {
        self.inner.add_text_box(text, position)
    }
    fn add_table(&mut self, _rows: &[Vec<String>]) -> Result<()> {
        Err(DeckError::RenderError("table host unavailable".to_string()))
    }
    fn set_notes(&mut self, text: &str) {
        self.inner.set_notes(text)
    }
    fn apply_span(&mut self, region: RegionRef, span: InlineSpan) -> Result<()> {
        self.inner.apply_span(region, span)
    }
}

impl SlideTarget for BareDeck {
    type Slide = BareSlide;

    fn new_slide(&mut self, layout: Layout) -> BareSlide {
        BareSlide {
            inner: self.inner.new_slide(layout),
        }
    }
    fn push_slide(&mut self, slide: BareSlide) -> Result<()> {
        self.inner.push_slide(slide.inner)
    }
    fn clear(&mut self) {
        self.inner.clear()
    }
    fn apply_theme(&mut self) {
        self.inner.apply_theme()
    }
    fn slide_count(&self) -> usize {
        self.inner.slide_count()
    }
}

#[test]
fn test_table_failure_degrades_to_joined_text() {
    let mut deck = BareDeck {
        inner: HtmlDeck::new(),
    };
    convert_markdown("# T\n| A | B |\n| 1 | 2 |", &mut deck, &ConvertOptions::default())
        .expect("degraded conversion still succeeds");

    let slide = &deck.inner.slides[0];
    assert!(slide.tables.is_empty());
    let fallback = slide
        .text_boxes
        .iter()
        .find(|(pos, _)| *pos == BoxPosition::BelowTitle)
        .map(|(_, payload)| payload.text.as_str());
    assert_eq!(fallback, Some("A | B\n1 | 2"));
}

#[test]
fn test_missing_body_region_creates_text_box() {
    let mut deck = BareDeck {
        inner: HtmlDeck::new(),
    };
    convert_markdown("# T\nbody text", &mut deck, &ConvertOptions::default()).unwrap();
    let slide = &deck.inner.slides[0];
    assert!(slide.body.is_none());
    assert_eq!(slide.text_boxes[0].0, BoxPosition::BelowTitle);
    assert_eq!(slide.text_boxes[0].1.text, "body text");

    convert_markdown("titleless text", &mut deck, &ConvertOptions::default()).unwrap();
    let slide = &deck.inner.slides[0];
    assert_eq!(slide.text_boxes[0].0, BoxPosition::NearTop);
}
