// ABOUTME: Inline formatting pass for the deckdown application
// ABOUTME: Locates bold, italic and inline-code spans in flattened slide text

use crate::model::{InlineSpan, SpanStyle};

/// Find all inline formatting spans in a text buffer. Bold pairs are
/// matched first, then italic, then code, each by repeated
/// non-overlapping matching. Character-level overlap between a bold and
/// an italic span is tolerated; spans are advisory and applied in the
/// order returned.
pub fn find_spans(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    find_bold(text, &mut spans);
    find_italic(text, &mut spans);
    find_delimited(text, '`', SpanStyle::Code, &mut spans);
    spans
}

/// Pair up `**` markers left to right.
fn find_bold(text: &str, spans: &mut Vec<InlineSpan>) {
    let mut from = 0;
    while let Some(open) = find_at(text, from, "**") {
        let Some(close) = find_at(text, open + 2, "**") else {
            break;
        };
        if close > open + 2 {
            spans.push(InlineSpan {
                start: open + 2,
                end: close,
                style: SpanStyle::Bold,
            });
        }
        from = close + 2;
    }
}

/// Pair up lone `*` markers. A marker adjacent to another `*` belongs
/// to a bold pair and must not start or end an italic span.
fn find_italic(text: &str, spans: &mut Vec<InlineSpan>) {
    let bytes = text.as_bytes();
    let lone: Vec<usize> = text
        .char_indices()
        .filter(|&(i, c)| {
            c == '*'
                && (i == 0 || bytes[i - 1] != b'*')
                && (i + 1 >= bytes.len() || bytes[i + 1] != b'*')
        })
        .map(|(i, _)| i)
        .collect();
    for pair in lone.chunks(2) {
        if let [open, close] = *pair {
            if close > open + 1 {
                spans.push(InlineSpan {
                    start: open + 1,
                    end: close,
                    style: SpanStyle::Italic,
                });
            }
        }
    }
}

/// Pair up single-character markers such as backticks.
fn find_delimited(text: &str, marker: char, style: SpanStyle, spans: &mut Vec<InlineSpan>) {
    let positions: Vec<usize> = text
        .char_indices()
        .filter(|&(_, c)| c == marker)
        .map(|(i, _)| i)
        .collect();
    for pair in positions.chunks(2) {
        if let [open, close] = *pair {
            if close > open + 1 {
                spans.push(InlineSpan {
                    start: open + 1,
                    end: close,
                    style,
                });
            }
        }
    }
}

fn find_at(text: &str, from: usize, needle: &str) -> Option<usize> {
    if from > text.len() {
        return None;
    }
    text[from..].find(needle).map(|i| i + from)
}
