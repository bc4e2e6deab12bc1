//! deepdish-tui: Terminal UI for the `DeepDish` chat client
//!
//! This crate provides the interactive front end:
//! - Chat screen with progressive answer reveal
//! - Profile overlay for name and allergies
//! - Background city lookup from configured coordinates

mod app;
mod event;
mod profile_editor;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

pub use app::App;
pub use deepdish_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use deepdish_engine::Config;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// Milliseconds between UI ticks (4 Hz).
const TICK_RATE_MS: u64 = 250;

/// Restores the terminal when dropped, even on panic.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI until the user quits.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(endpoint = %config.endpoint, "starting chat");
    let mut app = App::from_config(config);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    app.shutdown();
    terminal.show_cursor()?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screens::render_app(app, area, frame.buffer_mut());
        })?;

        tokio::select! {
            event = events.next() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
            Some(engine_event) = app.session.next_event() => {
                app.apply_engine_event(engine_event);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
