//! Screens and overlays of the `DeepDish` TUI.

pub mod chat;
pub mod profile;

use crate::app::App;
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Something that draws itself from the app state.
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Draw the whole UI: the chat screen plus whichever overlay is open.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    chat::ChatScreen.render(app, area, buf);

    if app.profile_editor.is_some() {
        profile::ProfileOverlay.render(app, area, buf);
    }
    if app.show_help {
        render_help_overlay(area, buf);
    }
}

/// Key reference.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Chat
    Enter             Send the question
    Alt+Enter         New line
    Up / Down         Previous questions
    PgUp / PgDn       Scroll the conversation

  Other
    Ctrl+P            Edit your profile
    F1                Toggle this help
    Esc / Ctrl+C      Quit

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 17.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
