// ABOUTME: Line classification for the deckdown parser
// ABOUTME: Tags each raw markdown line with a token consumed by the state machine

/// A classified markdown line. Classification is independent of parser
/// state; the state machine decides what each token means in context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A ``` delimiter opening or closing a fenced code region.
    Fence,
    /// A trimmed line starting and ending with a pipe.
    TableRow(&'a str),
    /// A heading of level 1-3; the text has any "SLIDE n:" label stripped.
    Heading(String),
    /// Three or more repeated dashes, underscores or asterisks.
    Rule,
    /// A line fully wrapped in `**`; carries the inner text.
    BoldOnly(&'a str),
    /// A line containing the case-insensitive phrase "speaker notes:".
    NotesMarker,
    /// A `>` block quote; carries the text with the marker stripped.
    Quote(&'a str),
    /// An unordered list item; indent = leading whitespace / 2.
    Bullet { indent: usize, text: &'a str },
    /// A `<digits>.` list item.
    Numbered(&'a str),
    Blank,
    /// Any other non-blank line.
    Text(&'a str),
}

/// Classify one raw line. Rules are evaluated in fixed priority order;
/// the first match wins.
pub fn classify(line: &str) -> LineKind<'_> {
    as_fence(line)
        .or_else(|| as_table_row(line))
        .or_else(|| as_heading(line))
        .or_else(|| as_rule(line))
        .or_else(|| as_bold_only(line))
        .or_else(|| as_notes_marker(line))
        .or_else(|| as_quote(line))
        .or_else(|| as_bullet(line))
        .or_else(|| as_numbered(line))
        .or_else(|| as_blank(line))
        .unwrap_or_else(|| LineKind::Text(line.trim()))
}

/// True when the classified token ends the current slide.
pub fn is_boundary(kind: &LineKind<'_>) -> bool {
    matches!(kind, LineKind::Heading(_) | LineKind::Rule)
}

fn as_fence(line: &str) -> Option<LineKind<'_>> {
    if line.trim_start().starts_with("```") {
        Some(LineKind::Fence)
    } else {
        None
    }
}

fn as_table_row(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim();
    if t.len() >= 2 && t.starts_with('|') && t.ends_with('|') {
        Some(LineKind::TableRow(t))
    } else {
        None
    }
}

/// A separator row contains only pipes, hyphens, colons and whitespace.
/// It is recognized inside TABLE mode and discarded.
pub fn is_table_separator(row: &str) -> bool {
    row.chars()
        .all(|c| c == '|' || c == '-' || c == ':' || c.is_whitespace())
}

fn as_heading(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim_start();
    let level = t.chars().take_while(|&c| c == '#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let rest = &t[level..];
    if !rest.starts_with(' ') {
        return None;
    }
    Some(LineKind::Heading(
        strip_slide_label(rest.trim()).to_string(),
    ))
}

/// Strip an optional leading "SLIDE n:" label from a heading title.
fn strip_slide_label(title: &str) -> &str {
    let lower = title.to_ascii_lowercase();
    let rest = match lower.strip_prefix("slide") {
        Some(r) => r,
        None => return title,
    };
    let ws = rest.len() - rest.trim_start().len();
    let after_ws = &rest[ws..];
    let digit_count = after_ws.chars().take_while(|c| c.is_ascii_digit()).count();
    if ws == 0 || digit_count == 0 {
        return title;
    }
    let after_digits = &after_ws[digit_count..];
    if let Some(stripped) = after_digits.strip_prefix(':') {
        // offsets computed on the lowercased copy apply to the original:
        // ASCII lowercasing preserves byte positions
        let consumed = title.len() - stripped.len();
        title[consumed..].trim_start()
    } else {
        title
    }
}

fn as_rule(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim();
    let mut chars = t.chars();
    let first = chars.next()?;
    if !matches!(first, '-' | '_' | '*') {
        return None;
    }
    if t.len() >= 3 && chars.all(|c| c == first) {
        Some(LineKind::Rule)
    } else {
        None
    }
}

fn as_bold_only(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim();
    if t.len() > 4 && t.starts_with("**") && t.ends_with("**") {
        let inner = &t[2..t.len() - 2];
        if !inner.is_empty() && !inner.contains("**") {
            return Some(LineKind::BoldOnly(inner));
        }
    }
    None
}

fn as_notes_marker(line: &str) -> Option<LineKind<'_>> {
    if line.to_ascii_lowercase().contains("speaker notes:") {
        Some(LineKind::NotesMarker)
    } else {
        None
    }
}

fn as_quote(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim_start();
    let rest = t.strip_prefix('>')?;
    Some(LineKind::Quote(rest.trim()))
}

fn as_bullet(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim_start();
    let rest = t.strip_prefix("- ").or_else(|| t.strip_prefix("* "))?;
    let indent = (line.len() - t.len()) / 2;
    Some(LineKind::Bullet {
        indent,
        text: rest.trim(),
    })
}

fn as_numbered(line: &str) -> Option<LineKind<'_>> {
    let t = line.trim();
    let digits = t.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = t[digits..].strip_prefix(". ")?;
    Some(LineKind::Numbered(rest.trim()))
}

fn as_blank(line: &str) -> Option<LineKind<'_>> {
    if line.trim().is_empty() {
        Some(LineKind::Blank)
    } else {
        None
    }
}

/// Strip one leading list marker from a captured speaker-notes line.
pub fn strip_list_marker(line: &str) -> &str {
    let t = line.trim();
    if let Some(rest) = t.strip_prefix("- ").or_else(|| t.strip_prefix("* ")) {
        return rest.trim();
    }
    let digits = t.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = t[digits..].strip_prefix(". ") {
            return rest.trim();
        }
    }
    t
}
