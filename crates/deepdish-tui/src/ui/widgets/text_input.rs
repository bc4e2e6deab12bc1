//! Multi-line text input.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const PROMPT: &str = "> ";

/// Renders a [`TextInputState`].
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    content: &'a str,
    cursor: usize,
    focused: bool,
    placeholder: Option<&'a str>,
}

impl<'a> TextInput<'a> {
    /// Set focus state. An unfocused input draws no cursor.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Text shown while the input is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        if self.content.is_empty() {
            let mut spans = vec![Span::styled(PROMPT, Styles::active())];
            if self.focused {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let indent = " ".repeat(PROMPT.len());
        let mut lines = Vec::new();
        let mut offset = 0;
        for (i, raw) in self.content.split('\n').enumerate() {
            let mut line = String::from(if i == 0 { PROMPT } else { indent.as_str() });
            let end = offset + raw.len();
            if self.focused && (offset..=end).contains(&self.cursor) {
                let at = self.cursor - offset;
                line.push_str(&raw[..at]);
                line.push(if at == raw.len() { '_' } else { '|' });
                line.push_str(&raw[at..]);
            } else {
                line.push_str(raw);
            }
            lines.push(Line::from(line));
            // Skip the newline itself.
            offset = end + 1;
        }

        // Keep the cursor line in view.
        let cursor_row = self.content[..self.cursor].matches('\n').count();
        let height = usize::from(area.height);
        let skip = (cursor_row + 1).saturating_sub(height);
        let visible: Vec<Line<'_>> = lines.into_iter().skip(skip).collect();

        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}

/// Content, cursor and submission history of a text input.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history; `None` when editing fresh input.
    history_index: Option<usize>,
    /// Input that was being typed before browsing started.
    saved_input: String,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `content`, cursor at the end.
    pub fn with_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            cursor: content.len(),
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines the content spans.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.content.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.content[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Take the content, remembering it in history if it is not blank.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() && self.history.last() != Some(&content) {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Whether an older entry is currently shown.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// Show the previous (older) history entry.
    pub fn history_prev(&mut self) {
        let next = match self.history_index {
            None if self.history.is_empty() => return,
            None => {
                self.saved_input = self.content.clone();
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.show_history(next);
    }

    /// Show the next (newer) history entry, or the saved input past the end.
    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };
        if i + 1 < self.history.len() {
            self.show_history(i + 1);
        } else {
            self.history_index = None;
            self.content = std::mem::take(&mut self.saved_input);
            self.cursor = self.content.len();
        }
    }

    /// A widget drawing this state.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            content: &self.content,
            cursor: self.cursor,
            focused: true,
            placeholder: None,
        }
    }

    fn show_history(&mut self, index: usize) {
        self.history_index = Some(index);
        self.content = self.history[index].clone();
        self.cursor = self.content.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_editing() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor(), 2);

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_cursor_movement_over_multibyte_chars() {
        let mut state = TextInputState::with_content("café");
        state.move_left();
        assert_eq!(state.cursor(), 3);
        state.insert('x');
        assert_eq!(state.content(), "cafxé");

        state.move_right();
        state.backspace();
        assert_eq!(state.content(), "cafx");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "afx");
        state.move_end();
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_history_navigation() {
        let mut state = TextInputState::new();
        state.insert_str("first");
        state.submit();
        state.insert_str("second");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("draft");
        state.history_prev();
        assert_eq!(state.content(), "second");
        assert!(state.is_browsing_history());
        state.history_prev();
        assert_eq!(state.content(), "first");
        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");
        state.history_next();
        assert_eq!(state.content(), "draft");
        assert!(!state.is_browsing_history());
    }

    #[test]
    fn test_blank_submissions_skip_history() {
        let mut state = TextInputState::with_content("   ");
        assert_eq!(state.submit(), "   ");
        state.history_prev();
        assert!(state.is_empty());
    }

    #[test]
    fn test_render_with_cursor_and_placeholder() {
        let area = Rect::new(0, 0, 20, 2);

        let mut buf = Buffer::empty(area);
        TextInputState::new()
            .widget()
            .placeholder("Ask me")
            .render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> _Ask me\n");

        let mut buf = Buffer::empty(area);
        let mut state = TextInputState::with_content("one\ntwo");
        state.move_left();
        state.widget().render(area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "> one\n  tw|o");
    }
}
