//! A controller wired to its runner.
//!
//! [`Session`] is what front ends drive: submit text, then feed engine
//! events back until the controller is idle again. All controller mutations
//! happen on the task that owns the session.

use crate::answer::AnswerService;
use crate::config::RevealConfig;
use crate::controller::{Controller, Status};
use crate::message::Message;
use crate::profile::UserProfile;
use crate::runner::{EngineEvent, Runner};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A conversation plus the machinery that executes its side effects.
pub struct Session {
    controller: Controller,
    runner: Runner,
    events: mpsc::UnboundedReceiver<EngineEvent>,
}

impl Session {
    /// Create a session talking to `service`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        service: Arc<dyn AnswerService>,
        reveal: RevealConfig,
        profile: &UserProfile,
    ) -> Self {
        let (runner, events) = Runner::new(service, reveal);
        Self {
            controller: Controller::new(reveal, profile),
            runner,
            events,
        }
    }

    /// The underlying state machine.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Mutable access for draft and profile edits.
    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// Messages exchanged so far.
    pub fn history(&self) -> &[Message] {
        self.controller.history()
    }

    /// Whether a query is still in progress.
    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Coarse status.
    pub fn status(&self) -> Status {
        self.controller.status()
    }

    /// Submit `text`. Returns `true` if the query was accepted.
    pub fn submit(&mut self, text: &str) -> bool {
        let commands = self.controller.submit_query(text);
        let accepted = !commands.is_empty();
        self.runner.execute(commands);
        accepted
    }

    /// Submit the controller's draft. Returns `true` if the query was accepted.
    pub fn submit_draft(&mut self) -> bool {
        let commands = self.controller.submit_draft();
        let accepted = !commands.is_empty();
        self.runner.execute(commands);
        accepted
    }

    /// Wait for the next engine event.
    ///
    /// Returns `None` only if the runner has been dropped.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.events.recv().await
    }

    /// Feed an engine event into the controller and execute the follow-ups.
    pub fn apply(&mut self, event: EngineEvent) {
        let commands = match event {
            EngineEvent::Replied { request, reply } => {
                self.controller.handle_reply(request, reply)
            }
            EngineEvent::RevealTick { reveal, chunk } => {
                self.controller.reveal_tick(reveal, chunk)
            }
        };
        self.runner.execute(commands);
    }

    /// Drive events until the controller is idle.
    ///
    /// `on_progress` sees the controller after every applied event.
    pub async fn run_until_idle_with<F>(&mut self, mut on_progress: F)
    where
        F: FnMut(&Controller),
    {
        while self.controller.is_pending() {
            let Some(event) = self.events.recv().await else {
                break;
            };
            self.apply(event);
            on_progress(&self.controller);
        }
    }

    /// Drive events until the controller is idle.
    pub async fn run_until_idle(&mut self) {
        self.run_until_idle_with(|_| {}).await;
    }

    /// Abort background work (query tasks and the reveal timer).
    pub fn shutdown(&mut self) {
        self.runner.shutdown();
    }
}
