//! The chat screen: transcript, input box and status bar.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::text::{visual_width, wrap_text};
use crate::ui::theme::{thinking_frame, Styles};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{chat_layout, main_layout};
use deepdish_engine::{Phase, Sender, Status, UserProfile};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const USER_LABEL: &str = "You: ";
const BOT_LABEL: &str = "DeepDish: ";

/// The main (and only) screen.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let (transcript_area, input_area) = chat_layout(main_area, app.input_state.line_count());

        render_transcript(app, transcript_area, buf);
        render_input(app, input_area, buf);

        let mode = match app.session.status() {
            Status::Idle => "Ready",
            Status::Awaiting => "Thinking",
            Status::Revealing => "Answering",
        };
        let summary = profile_summary(app.session.controller().profile());
        let right = app.notification.as_deref().unwrap_or(&summary);
        StatusBar::new(mode)
            .hints(vec![
                KeyHint::new("Enter", "Send"),
                KeyHint::new("^P", "Profile"),
                KeyHint::new("F1", "Help"),
                KeyHint::new("Esc", "Quit"),
            ])
            .right(right)
            .render(status_area, buf);
    }
}

/// Short description of the profile for the status bar.
pub fn profile_summary(profile: &UserProfile) -> String {
    let mut parts = Vec::new();
    if let Some(name) = profile.name() {
        parts.push(name.to_string());
    }
    if let Some(city) = &profile.city {
        parts.push(city.clone());
    }
    if !profile.allergies.is_empty() {
        parts.push(format!("avoids {}", profile.allergy_list()));
    }
    if parts.is_empty() {
        "No profile".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Transcript lines wrapped to `width`, including the pending answer.
pub fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in app.session.history() {
        let (label, style) = match message.sender {
            Sender::User => (USER_LABEL, Styles::user_label()),
            Sender::Bot => (BOT_LABEL, Styles::bot_label()),
        };
        push_message(&mut lines, label, style, &message.text, width);
    }

    match app.session.controller().phase() {
        Phase::Idle => {}
        Phase::Awaiting { .. } => {
            lines.push(Line::from(vec![
                Span::styled(BOT_LABEL, Styles::bot_label()),
                Span::styled(format!("thinking{}", thinking_frame(app.tick)), Styles::dim()),
            ]));
        }
        Phase::Revealing { progress, .. } => {
            push_message(&mut lines, BOT_LABEL, Styles::bot_label(), progress.buffer(), width);
        }
    }
    lines
}

fn push_message(
    lines: &mut Vec<Line<'static>>,
    label: &'static str,
    label_style: Style,
    text: &str,
    width: usize,
) {
    let label_width = visual_width(label);
    let body_width = width.saturating_sub(label_width).max(1);
    for (i, row) in wrap_text(text, body_width).into_iter().enumerate() {
        let prefix = if i == 0 {
            Span::styled(label, label_style)
        } else {
            Span::raw(" ".repeat(label_width))
        };
        lines.push(Line::from(vec![prefix, Span::styled(row, Styles::default())]));
    }
    lines.push(Line::default());
}

fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" DeepDish ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    if app.session.history().is_empty() && !app.session.is_pending() {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Hungry? Ask DeepDish about food.",
                Styles::highlight(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Example: \"What pizza is best?\"",
                Styles::dim(),
            )),
            Line::from(Span::styled(
                "  Press Ctrl+P to tell it your name and allergies.",
                Styles::dim(),
            )),
        ])
        .style(Styles::default())
        .render(inner, buf);
        return;
    }

    let lines = transcript_lines(app, usize::from(inner.width));
    let height = usize::from(inner.height);
    let max_back = lines.len().saturating_sub(height);
    let back = app.scroll_back.min(max_back);
    let start = max_back - back;

    let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
    Paragraph::new(visible)
        .style(Styles::default())
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let pending = app.session.is_pending();
    let block = Block::default()
        .title(" Ask ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(if pending {
            Styles::border()
        } else {
            Styles::border_active()
        })
        .style(Styles::default());

    let inner = block.inner(area);
    block.render(area, buf);

    app.input_state
        .widget()
        .focused(app.profile_editor.is_none())
        .placeholder(" What should I eat tonight?")
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_app, create_test_app_with, create_test_app_with_exchange,
        render_app_to_string, StaticAnswers,
    };
    use deepdish_engine::{
        Config, EngineEvent, Reply, RequestId, RevealConfig, RevealId, ERROR_MESSAGE,
    };

    #[test]
    fn test_welcome_hint_on_empty_history() {
        let app = create_test_app();
        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("Hungry? Ask DeepDish about food."));
        assert!(screen.contains("Ready"));
        assert!(screen.contains("No profile"));
    }

    #[tokio::test]
    async fn test_transcript_shows_exchange() {
        let app = create_test_app_with_exchange("What pizza is best?", "Deep dish.").await;
        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("You: What pizza is best?"));
        assert!(screen.contains("DeepDish: Deep dish."));
        assert!(!screen.contains("Hungry?"));
    }

    #[tokio::test]
    async fn test_thinking_indicator_while_awaiting() {
        let mut app = create_test_app_with(StaticAnswers::no_result());
        assert!(app.session.submit("What pizza is best?"));
        app.tick = 3;

        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("DeepDish: thinking..."));
        assert!(screen.contains("Thinking"));
    }

    #[tokio::test]
    async fn test_partial_reveal_is_rendered() {
        let config = Config {
            reveal: RevealConfig {
                tick_ms: 60_000,
                ..RevealConfig::default()
            },
            ..Config::default()
        };
        let mut app = crate::app::App::new(StaticAnswers::no_result(), &config);
        app.session.submit("pizza?");
        app.apply_engine_event(EngineEvent::Replied {
            request: RequestId(1),
            reply: Reply::Answered("Deep dish is the best pizza".into()),
        });
        app.apply_engine_event(EngineEvent::RevealTick {
            reveal: RevealId(1),
            chunk: 2,
        });

        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("DeepDish: Deep dish"));
        assert!(!screen.contains("best pizza"));
        assert!(screen.contains("Answering"));
        app.session.shutdown();
    }

    #[tokio::test]
    async fn test_failure_message_is_rendered() {
        let mut app = create_test_app_with(StaticAnswers::no_result());
        app.session.submit("pizza?");
        app.apply_engine_event(EngineEvent::Replied {
            request: RequestId(1),
            reply: Reply::Failed {
                reason: "connection refused".into(),
            },
        });
        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains(&format!("DeepDish: {ERROR_MESSAGE}")));
    }

    #[tokio::test]
    async fn test_long_messages_wrap_under_label() {
        let answer = "Deep dish pizza from Chicago has a tall buttery crust and the sauce goes on top";
        let app = create_test_app_with_exchange("tell me", answer).await;
        let lines = transcript_lines(&app, 40);
        let rendered: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(rendered[0], "You: tell me");
        assert!(rendered[2].starts_with("DeepDish: Deep dish"));
        assert!(rendered[3].starts_with("          "));
        assert!(rendered.iter().all(|l| visual_width(l) <= 40));
    }

    #[test]
    fn test_profile_summary() {
        assert_eq!(profile_summary(&UserProfile::default()), "No profile");
        let profile = UserProfile::new("Ada", ["peanuts"], Some("Chicago"));
        assert_eq!(profile_summary(&profile), "Ada | Chicago | avoids peanuts");
    }
}
