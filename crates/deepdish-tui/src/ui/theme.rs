//! Colors and styles for the `DeepDish` TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(28, 24, 22);
    pub const FG: Color = Color::Rgb(235, 225, 210);
    pub const DIM: Color = Color::Rgb(150, 138, 125);

    // Speakers
    pub const USER: Color = Color::Rgb(120, 180, 240);
    pub const BOT: Color = Color::Rgb(245, 170, 80);

    pub const STATUS_BG: Color = Color::Rgb(50, 42, 38);
    pub const STATUS_KEY_BG: Color = Color::Rgb(150, 70, 45);

    pub const BORDER: Color = Color::Rgb(90, 78, 70);
    pub const BORDER_ACTIVE: Color = Color::Rgb(245, 170, 80);
}

/// Frames of the "thinking" indicator, one per UI tick.
pub const THINKING_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// The thinking indicator frame for `tick`.
pub fn thinking_frame(tick: usize) -> &'static str {
    THINKING_FRAMES[tick % THINKING_FRAMES.len()]
}

/// Common styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Secondary text.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::BOT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label in front of the user's messages.
    pub fn user_label() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label in front of the bot's messages.
    pub fn bot_label() -> Style {
        Style::default()
            .fg(Palette::BOT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn active() -> Style {
        Style::default().fg(Palette::BOT).bg(Palette::BG)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Palette::BOT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key in a status bar hint.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Label next to a key hint.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}
