//! Profile overlay.

use crate::app::App;
use crate::profile_editor::ProfileField;
use crate::screens::Screen;
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Name and allergy editor drawn over the chat screen.
pub struct ProfileOverlay;

impl Screen for ProfileOverlay {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let Some(editor) = &app.profile_editor else {
            return;
        };

        let overlay_area = centered_fixed(56, 9, area);
        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Profile ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let rows = [
            Some((
                "Name",
                &editor.name,
                editor.focus == ProfileField::Name,
            )),
            None,
            Some((
                "Allergies (comma-separated)",
                &editor.allergies,
                editor.focus == ProfileField::Allergies,
            )),
        ];

        let mut y = inner.y;
        let bottom = inner.y.saturating_add(inner.height);
        for row in rows {
            let Some((label, state, focused)) = row else {
                y += 1;
                continue;
            };
            if y + 1 >= bottom {
                return;
            }
            let label_style = if focused {
                Styles::highlight()
            } else {
                Styles::dim()
            };
            buf.set_string(inner.x + 1, y, label, label_style);
            state
                .widget()
                .focused(focused)
                .render(Rect::new(inner.x + 1, y + 1, inner.width.saturating_sub(2), 1), buf);
            y += 2;
        }

        if y + 1 < bottom {
            Paragraph::new(Line::from(Span::styled(
                " Tab: switch field  Enter: save  Esc: cancel",
                Styles::dim(),
            )))
            .render(Rect::new(inner.x, y + 1, inner.width, 1), buf);
        }
    }
}
