//! Application state and input handling for the `DeepDish` TUI.

use crate::event::{key_to_action, Action, Event};
use crate::profile_editor::ProfileEditor;
use crate::ui::widgets::TextInputState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use deepdish_engine::{
    resolve_city, AnswerService, CityLocator, Config, Coordinates, EngineEvent, HttpAnswerService,
    HttpCityLocator, Session,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// UI ticks a notification stays visible (about 3 seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Lines moved by PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// A background reverse-geocoding lookup, aborted when dropped.
struct CityLookup {
    task: JoinHandle<()>,
    rx: oneshot::Receiver<Option<String>>,
}

impl CityLookup {
    fn start(locator: Arc<dyn CityLocator>, coords: Coordinates) -> Self {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let city = resolve_city(locator.as_ref(), coords).await;
            let _ = tx.send(city);
        });
        Self { task, rx }
    }
}

impl Drop for CityLookup {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Everything the TUI shows and edits.
pub struct App {
    pub session: Session,
    pub input_state: TextInputState,
    /// Open while the profile overlay is shown.
    pub profile_editor: Option<ProfileEditor>,
    /// Transcript lines scrolled back from the bottom.
    pub scroll_back: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub notification: Option<String>,
    notification_ttl: usize,
    /// UI tick counter, drives the thinking indicator.
    pub tick: usize,
    city_lookup: Option<CityLookup>,
}

impl App {
    /// Create the app for `config`, talking to its HTTP endpoints.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        let service = Arc::new(HttpAnswerService::new(&config.endpoint));
        let mut app = Self::new(service, config);
        if let Some(coords) = config.location {
            if config.profile.city.is_none() {
                app.start_city_lookup(Arc::new(HttpCityLocator::new(&config.geocode_url)), coords);
            }
        }
        app
    }

    /// Create the app with an explicit answer service.
    pub fn new(service: Arc<dyn AnswerService>, config: &Config) -> Self {
        Self {
            session: Session::new(service, config.reveal, &config.profile),
            input_state: TextInputState::new(),
            profile_editor: None,
            scroll_back: 0,
            show_help: false,
            should_quit: false,
            notification: None,
            notification_ttl: 0,
            tick: 0,
            city_lookup: None,
        }
    }

    /// Look up the city in the background; it is applied on a later tick.
    pub fn start_city_lookup(&mut self, locator: Arc<dyn CityLocator>, coords: Coordinates) {
        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "starting city lookup"
        );
        self.city_lookup = Some(CityLookup::start(locator, coords));
    }

    /// Whether a city lookup is still outstanding.
    pub fn is_locating(&self) -> bool {
        self.city_lookup.is_some()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_up(1),
                MouseEventKind::ScrollDown => self.scroll_down(1),
                _ => {}
            },
            Event::Tick => self.tick(),
            Event::Resize(_, _) => {}
        }
    }

    /// Feed an engine event to the session.
    pub fn apply_engine_event(&mut self, event: EngineEvent) {
        self.session.apply(event);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let action = key_to_action(key);

        // Any key closes help.
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.profile_editor.is_some() {
            self.handle_profile_key(key, action);
            return;
        }

        match action {
            Action::Quit | Action::Back => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Profile => {
                self.profile_editor = Some(ProfileEditor::from_profile(
                    self.session.controller().profile(),
                ));
            }
            Action::Submit => self.submit(),
            Action::Newline => self.input_state.insert('\n'),
            Action::ScrollUp => self.scroll_up(PAGE_LINES),
            Action::ScrollDown => self.scroll_down(PAGE_LINES),
            Action::NextField | Action::None => self.handle_input_key(key),
        }
    }

    /// Submit the input box as a query.
    fn submit(&mut self) {
        if self.session.is_pending() {
            self.set_notification("Still waiting for the last answer".to_string());
            return;
        }
        if self.input_state.content().trim().is_empty() {
            return;
        }

        let text = self.input_state.submit();
        self.session.controller_mut().set_draft(text);
        if self.session.submit_draft() {
            self.scroll_back = 0;
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        let input = &mut self.input_state;
        match key.code {
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Up if input.is_empty() || input.is_browsing_history() => input.history_prev(),
            KeyCode::Down if input.is_browsing_history() => input.history_next(),
            KeyCode::Up => self.scroll_back = self.scroll_back.saturating_add(1),
            KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
            _ => {}
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent, action: Action) {
        let Some(editor) = self.profile_editor.as_mut() else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => self.profile_editor = None,
            Action::NextField => editor.toggle_focus(),
            Action::Submit => {
                let profile = editor.apply_to(self.session.controller().profile());
                info!("profile updated");
                self.session.controller_mut().set_profile(&profile);
                self.profile_editor = None;
                self.set_notification("Profile updated".to_string());
            }
            _ if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            _ => {
                let field = editor.focused_mut();
                match key.code {
                    KeyCode::Char(c) => field.insert(c),
                    KeyCode::Backspace => field.backspace(),
                    KeyCode::Delete => field.delete(),
                    KeyCode::Left => field.move_left(),
                    KeyCode::Right => field.move_right(),
                    KeyCode::Home => field.move_home(),
                    KeyCode::End => field.move_end(),
                    _ => {}
                }
            }
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Show `msg` in the status bar for a few seconds.
    pub fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Advance time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }

        self.poll_city_lookup();
    }

    fn poll_city_lookup(&mut self) {
        let Some(lookup) = self.city_lookup.as_mut() else {
            return;
        };
        match lookup.rx.try_recv() {
            Ok(city) => {
                self.city_lookup = None;
                if let Some(city) = city {
                    if self.session.controller_mut().offer_city(&city) {
                        self.set_notification(format!("Located: {city}"));
                    }
                }
            }
            Err(oneshot::error::TryRecvError::Closed) => self.city_lookup = None,
            Err(oneshot::error::TryRecvError::Empty) => {}
        }
    }

    /// Stop background work before exit.
    pub fn shutdown(&mut self) {
        self.city_lookup = None;
        self.session.shutdown();
    }
}
