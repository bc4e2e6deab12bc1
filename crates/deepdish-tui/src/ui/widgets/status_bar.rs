//! Status bar widget.

use crate::ui::text::{truncate_to_width, visual_width};
use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// A key and what it does.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// One-line bar at the bottom of the screen: mode badge, key hints and a
/// right-aligned message.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
        }
    }

    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Styles::default().bg(Palette::BOT).fg(Palette::BG),
            ),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }
        let left = Line::from(spans);
        let left_width = left.width();
        buf.set_line(area.x, area.y, &left, area.width);

        // The right text wins over hints that would collide with it.
        if let Some(text) = self.right_text {
            let width = usize::from(area.width);
            let text = truncate_to_width(text, width.saturating_sub(2));
            let text_width = visual_width(&text);
            if text_width + 1 < width {
                if left_width + text_width + 2 > width {
                    let start = width.saturating_sub(text_width + 2);
                    for x in start..width {
                        if let Ok(x) = u16::try_from(x) {
                            buf[(area.x + x, area.y)]
                                .set_char(' ')
                                .set_style(Styles::status_bar());
                        }
                    }
                }
                let x = width - text_width - 1;
                if let Ok(x) = u16::try_from(x) {
                    buf.set_string(area.x + x, area.y, &text, Styles::status_bar());
                }
            }
        }
    }
}
