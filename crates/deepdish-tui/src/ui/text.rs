//! Width-aware text helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of `s` in terminal cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` cells, marking the cut with "...".
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }
    let target = max_width.saturating_sub(3);

    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > target {
            break;
        }
        result.push(ch);
        width += w;
    }
    result.push_str("...");
    result
}

/// Wrap `text` to `width` cells, keeping explicit line breaks.
///
/// Empty input yields a single empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(String::from).collect();
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }
    lines
}
