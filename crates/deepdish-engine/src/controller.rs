//! Conversation controller: the query/response state machine.
//!
//! The controller never performs I/O. Every transition returns the
//! [`Command`]s the caller must carry out (send a query, start or stop a
//! reveal timer), and results come back through [`Controller::handle_reply`]
//! and [`Controller::reveal_tick`]. This keeps every transition testable
//! without a network or a clock.
//!
//! ```text
//! Idle --submit--> Awaiting --reply--> Revealing --last tick--> Idle
//!                      |                                         ^
//!                      +--error / no result / reveal off---------+
//! ```

use crate::config::RevealConfig;
use crate::message::{Message, ERROR_MESSAGE, NO_RESULTS_MESSAGE};
use crate::profile::UserProfile;
use crate::request::QueryRequest;
use crate::reveal::WordReveal;
use tracing::{debug, info, warn};

/// Identifies one submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Identifies one reveal (and the timer driving it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevealId(pub u64);

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a query to the answer service.
    SendQuery {
        request: RequestId,
        payload: QueryRequest,
    },
    /// Start ticking for a reveal. Any older reveal timer is stale.
    StartReveal { reveal: RevealId },
    /// Stop the timer for a reveal.
    CancelReveal { reveal: RevealId },
}

/// Reply to a query, as reported by whoever executed [`Command::SendQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The service answered with this text.
    Answered(String),
    /// The reply had no usable result.
    NoResult,
    /// Transport or parse failure.
    Failed { reason: String },
}

/// Where the controller is in the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Ready for a new query.
    #[default]
    Idle,
    /// A query is in flight.
    Awaiting { request: RequestId },
    /// The answer arrived and is being revealed.
    Revealing {
        reveal: RevealId,
        progress: WordReveal,
    },
}

/// Coarse status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Awaiting,
    Revealing,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Awaiting => write!(f, "awaiting"),
            Self::Revealing => write!(f, "revealing"),
        }
    }
}

/// The conversation state machine.
#[derive(Debug, Clone)]
pub struct Controller {
    history: Vec<Message>,
    draft: String,
    phase: Phase,
    profile: UserProfile,
    reveal: RevealConfig,
    next_request: u64,
    next_reveal: u64,
    /// Reveal whose timer may still be running.
    live_timer: Option<RevealId>,
}

impl Controller {
    /// Create an idle controller with an empty history.
    pub fn new(reveal: RevealConfig, profile: &UserProfile) -> Self {
        Self {
            history: Vec::new(),
            draft: String::new(),
            phase: Phase::Idle,
            profile: profile.normalized(),
            reveal,
            next_request: 1,
            next_reveal: 1,
            live_timer: None,
        }
    }

    /// Messages exchanged so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The unsent input text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the unsent input text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Coarse status.
    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Idle => Status::Idle,
            Phase::Awaiting { .. } => Status::Awaiting,
            Phase::Revealing { .. } => Status::Revealing,
        }
    }

    /// Whether a query (or its reveal) is still in progress.
    pub fn is_pending(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Text revealed so far, while revealing.
    pub fn reveal_buffer(&self) -> Option<&str> {
        match &self.phase {
            Phase::Revealing { progress, .. } => Some(progress.buffer()),
            _ => None,
        }
    }

    /// Profile attached to outgoing queries.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replace the profile used for later queries.
    pub fn set_profile(&mut self, profile: &UserProfile) {
        self.profile = profile.normalized();
    }

    /// Set the city unless one is already known.
    ///
    /// Returns `true` if the city was applied.
    pub fn offer_city(&mut self, city: &str) -> bool {
        if self.profile.city.is_some() {
            return false;
        }
        self.profile.set_city(Some(city));
        self.profile.city.is_some()
    }

    /// Reveal pacing.
    pub fn reveal_config(&self) -> RevealConfig {
        self.reveal
    }

    /// Submit `text` as a query.
    ///
    /// Blank text, or any submission while a query is pending, is ignored and
    /// yields no commands.
    pub fn submit_query(&mut self, text: &str) -> Vec<Command> {
        if text.trim().is_empty() {
            debug!("ignoring blank query");
            return Vec::new();
        }
        if self.is_pending() {
            debug!(status = %self.status(), "ignoring query while pending");
            return Vec::new();
        }

        let request = RequestId(self.next_request);
        self.next_request += 1;

        self.history.push(Message::user(text));
        self.draft.clear();
        self.phase = Phase::Awaiting { request };
        info!(request = request.0, "query submitted");

        vec![Command::SendQuery {
            request,
            payload: QueryRequest::with_profile(text, &self.profile),
        }]
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> Vec<Command> {
        let text = self.draft.clone();
        self.submit_query(&text)
    }

    /// Feed back the reply to a query.
    ///
    /// Replies to anything but the query currently awaited are ignored.
    pub fn handle_reply(&mut self, request: RequestId, reply: Reply) -> Vec<Command> {
        if self.phase != (Phase::Awaiting { request }) {
            debug!(request = request.0, "ignoring stale reply");
            return Vec::new();
        }

        match reply {
            Reply::Answered(text) => self.accept_answer(text),
            Reply::NoResult => {
                debug!(request = request.0, "reply carried no result");
                self.finish(Message::bot(NO_RESULTS_MESSAGE));
                Vec::new()
            }
            Reply::Failed { reason } => {
                warn!(request = request.0, %reason, "query failed");
                self.finish(Message::bot(ERROR_MESSAGE));
                Vec::new()
            }
        }
    }

    /// Advance the current reveal by `chunk` words.
    ///
    /// Ticks for any reveal but the current one are ignored.
    pub fn reveal_tick(&mut self, reveal: RevealId, chunk: usize) -> Vec<Command> {
        let Phase::Revealing {
            reveal: current,
            progress,
        } = &mut self.phase
        else {
            debug!(reveal = reveal.0, "ignoring reveal tick while not revealing");
            return Vec::new();
        };
        if *current != reveal {
            debug!(reveal = reveal.0, "ignoring stale reveal tick");
            return Vec::new();
        }

        let (min, max) = self.reveal.chunk_bounds();
        if !progress.advance(chunk.clamp(min, max)) {
            return Vec::new();
        }

        if let Phase::Revealing { progress, .. } = std::mem::take(&mut self.phase) {
            self.finish(Message::bot(progress.into_text()));
        }
        self.stop_timer()
    }

    fn accept_answer(&mut self, text: String) -> Vec<Command> {
        let progress = WordReveal::new(text);
        if !self.reveal.enabled || progress.word_count() == 0 {
            self.finish(Message::bot(progress.into_text()));
            return Vec::new();
        }

        let mut commands = self.stop_timer();
        let reveal = RevealId(self.next_reveal);
        self.next_reveal += 1;
        debug!(reveal = reveal.0, words = progress.word_count(), "starting reveal");

        self.phase = Phase::Revealing { reveal, progress };
        self.live_timer = Some(reveal);
        commands.push(Command::StartReveal { reveal });
        commands
    }

    fn stop_timer(&mut self) -> Vec<Command> {
        self.live_timer
            .take()
            .map(|reveal| Command::CancelReveal { reveal })
            .into_iter()
            .collect()
    }

    fn finish(&mut self, message: Message) {
        self.history.push(message);
        self.phase = Phase::Idle;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(RevealConfig::default(), &UserProfile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    fn sent_request(commands: &[Command]) -> RequestId {
        match commands {
            [Command::SendQuery { request, .. }] => *request,
            other => panic!("expected a single SendQuery, got {other:?}"),
        }
    }

    fn started_reveal(commands: &[Command]) -> RevealId {
        commands
            .iter()
            .find_map(|c| match c {
                Command::StartReveal { reveal } => Some(*reveal),
                _ => None,
            })
            .expect("expected StartReveal")
    }

    fn no_reveal() -> Controller {
        Controller::new(RevealConfig::disabled(), &UserProfile::default())
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let mut c = Controller::default();
        for text in ["", "   ", "\n\t "] {
            assert!(c.submit_query(text).is_empty());
        }
        assert!(c.history().is_empty());
        assert!(!c.is_pending());
    }

    #[test]
    fn test_submit_appends_user_message_and_clears_draft() {
        let mut c = Controller::default();
        c.set_draft("What pizza is best?");
        let commands = c.submit_draft();

        assert_eq!(c.history(), &[Message::user("What pizza is best?")]);
        assert!(c.is_pending());
        assert_eq!(c.status(), Status::Awaiting);
        assert_eq!(c.draft(), "");
        match &commands[..] {
            [Command::SendQuery { payload, .. }] => {
                assert_eq!(payload.query, "What pizza is best?");
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut c = Controller::default();
        let first = sent_request(&c.submit_query("first"));

        c.set_draft("second");
        assert!(c.submit_draft().is_empty());
        assert_eq!(c.history().len(), 1);
        assert!(c.is_pending());
        assert_eq!(c.draft(), "second");

        c.handle_reply(first, Reply::NoResult);
        assert!(!c.is_pending());
        assert_eq!(c.history().len(), 2);
    }

    #[test]
    fn test_answer_without_reveal_commits_directly() {
        let mut c = no_reveal();
        let request = sent_request(&c.submit_query("What pizza is best?"));
        let commands = c.handle_reply(request, Reply::Answered("Deep dish.".into()));

        assert!(commands.is_empty());
        assert_eq!(
            c.history(),
            &[
                Message::user("What pizza is best?"),
                Message::bot("Deep dish.")
            ]
        );
        assert!(!c.is_pending());
        assert!(c.reveal_buffer().is_none());
    }

    #[test]
    fn test_reveal_commits_original_text_once() {
        let text = "Deep dish,   with\na  buttery crust.";
        let mut c = Controller::default();
        let request = sent_request(&c.submit_query("q"));
        let reveal = started_reveal(&c.handle_reply(request, Reply::Answered(text.into())));

        assert_eq!(c.status(), Status::Revealing);
        assert!(c.is_pending());
        assert_eq!(c.reveal_buffer(), Some(""));
        assert_eq!(c.history().len(), 1);

        let mut ticks = 0;
        while c.is_pending() {
            let commands = c.reveal_tick(reveal, 2);
            ticks += 1;
            if let Some(buffer) = c.reveal_buffer() {
                assert!(text.starts_with(buffer));
                assert!(buffer.len() < text.len());
                assert!(commands.is_empty());
            } else {
                assert_eq!(commands, vec![Command::CancelReveal { reveal }]);
            }
        }

        assert_eq!(ticks, 3);
        assert_eq!(c.history()[1], Message::bot(text));
        assert_eq!(c.history().len(), 2);
        assert!(c.reveal_buffer().is_none());
    }

    #[test]
    fn test_chunk_is_clamped_to_bounds() {
        let mut c = Controller::default();
        let request = sent_request(&c.submit_query("q"));
        let reveal = started_reveal(
            &c.handle_reply(request, Reply::Answered("a b c d e f g h i j".into())),
        );

        c.reveal_tick(reveal, 100);
        assert_eq!(c.reveal_buffer(), Some("a b c d"));
        c.reveal_tick(reveal, 0);
        assert_eq!(c.reveal_buffer(), Some("a b c d e"));
    }

    #[test]
    fn test_unbounded_max_chunk_finishes_reveal() {
        let reveal_config = RevealConfig {
            max_chunk: usize::MAX,
            ..RevealConfig::default()
        };
        let mut c = Controller::new(reveal_config, &UserProfile::default());
        let request = sent_request(&c.submit_query("q"));
        let reveal = started_reveal(&c.handle_reply(request, Reply::Answered("a b c".into())));

        c.reveal_tick(reveal, 1);
        assert_eq!(c.reveal_buffer(), Some("a"));
        assert_eq!(
            c.reveal_tick(reveal, usize::MAX),
            vec![Command::CancelReveal { reveal }]
        );
        assert_eq!(c.history().last(), Some(&Message::bot("a b c")));
        assert!(!c.is_pending());
    }

    #[test]
    fn test_stale_reply_is_ignored() {
        let mut c = no_reveal();
        let first = sent_request(&c.submit_query("one"));
        c.handle_reply(first, Reply::Answered("1".into()));
        let second = sent_request(&c.submit_query("two"));

        assert!(c
            .handle_reply(first, Reply::Answered("late".into()))
            .is_empty());
        assert_eq!(c.history().len(), 3);
        assert!(c.is_pending());

        c.handle_reply(second, Reply::Answered("2".into()));
        assert_eq!(c.history().last(), Some(&Message::bot("2")));
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut c = Controller::default();
        let r1 = sent_request(&c.submit_query("one"));
        let first = started_reveal(&c.handle_reply(r1, Reply::Answered("a".into())));
        c.reveal_tick(first, 1);
        assert!(!c.is_pending());

        let r2 = sent_request(&c.submit_query("two"));
        let second = started_reveal(&c.handle_reply(r2, Reply::Answered("x y z".into())));
        assert_ne!(first, second);

        assert!(c.reveal_tick(first, 4).is_empty());
        assert_eq!(c.reveal_buffer(), Some(""));

        c.reveal_tick(second, 1);
        assert_eq!(c.reveal_buffer(), Some("x"));
    }

    #[test]
    fn test_tick_while_idle_is_ignored() {
        let mut c = Controller::default();
        assert!(c.reveal_tick(RevealId(1), 1).is_empty());
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_failure_appends_generic_error() {
        let mut c = Controller::default();
        let request = sent_request(&c.submit_query("What pizza is best?"));
        let commands = c.handle_reply(
            request,
            Reply::Failed {
                reason: "connection refused".into(),
            },
        );

        assert!(commands.is_empty());
        assert_eq!(c.history()[1], Message::bot(ERROR_MESSAGE));
        assert_eq!(c.history().len(), 2);
        assert!(!c.is_pending());
    }

    #[test]
    fn test_no_result_appends_generic_message() {
        let mut c = Controller::default();
        let request = sent_request(&c.submit_query("What pizza is best?"));
        c.handle_reply(request, Reply::NoResult);

        assert_eq!(c.history()[1], Message::bot(NO_RESULTS_MESSAGE));
        assert!(!c.is_pending());
    }

    #[test]
    fn test_whitespace_answer_skips_reveal() {
        let mut c = Controller::default();
        let request = sent_request(&c.submit_query("q"));
        assert!(c.handle_reply(request, Reply::Answered("  ".into())).is_empty());
        assert!(!c.is_pending());
        assert_eq!(c.history()[1].sender, Sender::Bot);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut c = no_reveal();
        let mut snapshot: Vec<Message> = Vec::new();
        for (i, reply) in [
            Reply::Answered("yes".into()),
            Reply::NoResult,
            Reply::Failed {
                reason: "boom".into(),
            },
        ]
        .into_iter()
        .enumerate()
        {
            let request = sent_request(&c.submit_query(&format!("q{i}")));
            c.handle_reply(request, reply);
            assert!(c.history().starts_with(&snapshot));
            snapshot = c.history().to_vec();
        }
        assert_eq!(snapshot.len(), 6);
    }

    #[test]
    fn test_profile_rides_along() {
        let profile = UserProfile::new("Ada", ["peanuts"], None);
        let mut c = Controller::new(RevealConfig::default(), &profile);
        assert!(c.offer_city("Chicago"));
        assert!(!c.offer_city("Boston"));

        match &c.submit_query("q")[..] {
            [Command::SendQuery { payload, .. }] => {
                assert_eq!(payload.name.as_deref(), Some("Ada"));
                assert_eq!(payload.city.as_deref(), Some("Chicago"));
                assert_eq!(payload.allergies, Some(vec!["peanuts".to_string()]));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }
}
