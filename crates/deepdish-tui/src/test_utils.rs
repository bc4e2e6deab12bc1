//! Helpers for rendering and driving the TUI in tests.

use crate::app::App;
use crate::screens::render_app;
use async_trait::async_trait;
use deepdish_engine::{Answer, AnswerError, AnswerService, Config, QueryRequest, RevealConfig};
use ratatui::{buffer::Buffer, layout::Rect};
use std::sync::Arc;
use std::time::Duration;

/// Answers every query the same way.
pub struct StaticAnswers(Answer);

impl StaticAnswers {
    pub fn found(text: &str) -> Arc<Self> {
        Arc::new(Self(Answer::Found(text.to_string())))
    }

    pub fn no_result() -> Arc<Self> {
        Arc::new(Self(Answer::NoResult))
    }
}

#[async_trait]
impl AnswerService for StaticAnswers {
    async fn ask(&self, _request: &QueryRequest) -> Result<Answer, AnswerError> {
        Ok(self.0.clone())
    }
}

/// Default config with the reveal turned off, so answers land at once.
pub fn test_config() -> Config {
    Config {
        reveal: RevealConfig::disabled(),
        ..Config::default()
    }
}

pub fn create_test_app() -> App {
    create_test_app_with(StaticAnswers::no_result())
}

pub fn create_test_app_with(service: Arc<StaticAnswers>) -> App {
    App::new(service, &test_config())
}

/// An app that has already asked `question` and received `answer`.
pub async fn create_test_app_with_exchange(question: &str, answer: &str) -> App {
    let mut app = create_test_app_with(StaticAnswers::found(answer));
    assert!(app.session.submit(question));
    tokio::time::timeout(Duration::from_secs(5), app.session.run_until_idle())
        .await
        .expect("session did not settle");
    app
}

/// Buffer contents as text, trailing spaces trimmed from each row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }
    result
}

/// Render the whole UI at the given size.
pub fn render_app_to_string(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_app(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Deep", ratatui::style::Style::default());
        buffer.set_string(0, 1, "dish", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Deep\ndish\n");
    }
}
