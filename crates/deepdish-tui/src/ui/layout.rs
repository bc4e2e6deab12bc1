//! Layout helpers.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rect of fixed size centered in `area`, shrunk to fit.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Split `area` into the main content and a one-line status bar.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split the main content into transcript and input box.
///
/// The input box grows with its content, between 3 and 8 rows.
pub fn chat_layout(area: Rect, input_lines: usize) -> (Rect, Rect) {
    let input_height = u16::try_from(input_lines.saturating_add(2))
        .unwrap_or(u16::MAX)
        .clamp(3, 8);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(input_height)])
        .split(area);
    (chunks[0], chunks[1])
}
