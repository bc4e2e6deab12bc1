//! Terminal events and key bindings.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events coming from the terminal.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Nothing happened for one tick period.
    Tick,
    Resize(u16, u16),
}

/// Polls the terminal on a background thread and forwards events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start polling, emitting [`Event::Tick`] every `tick_rate_ms` of inactivity.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm polling blocks, so it gets its own thread.
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };
                if let Some(event) = event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// What a key press means, before any text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Esc: leave the current overlay, or quit.
    Back,
    Help,
    Profile,
    Submit,
    Newline,
    NextField,
    ScrollUp,
    ScrollDown,
    /// Not a binding; the key is text input.
    None,
}

/// Map a key to its binding.
pub fn key_to_action(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('p') if ctrl => Action::Profile,
        KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => Action::Newline,
        KeyCode::Enter => Action::Submit,
        KeyCode::Esc => Action::Back,
        KeyCode::F(1) => Action::Help,
        KeyCode::Tab | KeyCode::BackTab => Action::NextField,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        _ => Action::None,
    }
}
