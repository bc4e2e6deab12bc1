//! Effect runner for controller commands.
//!
//! The runner turns [`Command`]s into tokio tasks and reports their results
//! as [`EngineEvent`]s on an unbounded channel. It owns at most one reveal
//! timer; starting a new reveal or dropping the runner aborts the old one.

use crate::answer::{Answer, AnswerService};
use crate::config::RevealConfig;
use crate::controller::{Command, Reply, RequestId, RevealId};
use crate::request::QueryRequest;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Results of executed commands, to be fed back into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The answer service replied (or failed) for a query.
    Replied { request: RequestId, reply: Reply },
    /// A reveal timer fired; reveal `chunk` more words.
    RevealTick { reveal: RevealId, chunk: usize },
}

/// Owned handle to a running reveal timer.
///
/// The timer task is aborted when the handle is dropped.
#[derive(Debug)]
pub struct RevealTimer {
    reveal: RevealId,
    task: JoinHandle<()>,
}

impl RevealTimer {
    /// Start ticking for `reveal`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        reveal: RevealId,
        config: RevealConfig,
        event_tx: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        let (min, max) = config.chunk_bounds();
        let period = config.tick_interval();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let chunk = rand::thread_rng().gen_range(min..=max);
                if event_tx
                    .send(EngineEvent::RevealTick { reveal, chunk })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self { reveal, task }
    }

    /// The reveal this timer drives.
    pub fn reveal(&self) -> RevealId {
        self.reveal
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Executes controller commands.
pub struct Runner {
    service: Arc<dyn AnswerService>,
    reveal: RevealConfig,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    timer: Option<RevealTimer>,
    in_flight: Vec<JoinHandle<()>>,
}

impl Runner {
    /// Create a runner and the receiver its events arrive on.
    pub fn new(
        service: Arc<dyn AnswerService>,
        reveal: RevealConfig,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runner = Self {
            service,
            reveal,
            event_tx,
            timer: None,
            in_flight: Vec::new(),
        };
        (runner, event_rx)
    }

    /// Carry out `commands` in order.
    pub fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::SendQuery { request, payload } => self.send_query(request, payload),
                Command::StartReveal { reveal } => {
                    debug!(reveal = reveal.0, "starting reveal timer");
                    // Replacing the handle aborts any previous timer.
                    self.timer = Some(RevealTimer::start(
                        reveal,
                        self.reveal,
                        self.event_tx.clone(),
                    ));
                }
                Command::CancelReveal { reveal } => {
                    if self.timer.as_ref().is_some_and(|t| t.reveal() == reveal) {
                        debug!(reveal = reveal.0, "stopping reveal timer");
                        self.timer = None;
                    }
                }
            }
        }
    }

    /// The reveal currently being ticked, if any.
    pub fn active_reveal(&self) -> Option<RevealId> {
        self.timer.as_ref().map(RevealTimer::reveal)
    }

    /// Abort every background task.
    pub fn shutdown(&mut self) {
        self.timer = None;
        for task in self.in_flight.drain(..) {
            task.abort();
        }
    }

    fn send_query(&mut self, request: RequestId, payload: QueryRequest) {
        self.in_flight.retain(|task| !task.is_finished());

        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        let task = tokio::spawn(async move {
            let reply = match service.ask(&payload).await {
                Ok(Answer::Found(text)) => Reply::Answered(text),
                Ok(Answer::NoResult) => Reply::NoResult,
                Err(e) => {
                    warn!(request = request.0, error = %e, "answer service call failed");
                    Reply::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            // The receiver is gone only when the session was discarded.
            let _ = event_tx.send(EngineEvent::Replied { request, reply });
        });
        self.in_flight.push(task);
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl AnswerService for Echo {
        async fn ask(&self, request: &QueryRequest) -> Result<Answer, AnswerError> {
            Ok(Answer::Found(format!("echo: {}", request.query)))
        }
    }

    fn fast_reveal() -> RevealConfig {
        RevealConfig {
            tick_ms: 1,
            ..RevealConfig::default()
        }
    }

    #[tokio::test]
    async fn test_send_query_reports_reply() {
        let (mut runner, mut rx) = Runner::new(Arc::new(Echo), fast_reveal());
        runner.execute(vec![Command::SendQuery {
            request: RequestId(7),
            payload: QueryRequest::new("hi"),
        }]);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            EngineEvent::Replied {
                request: RequestId(7),
                reply: Reply::Answered("echo: hi".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_reveal_ticks_within_bounds() {
        let (mut runner, mut rx) = Runner::new(Arc::new(Echo), fast_reveal());
        runner.execute(vec![Command::StartReveal {
            reveal: RevealId(1),
        }]);
        assert_eq!(runner.active_reveal(), Some(RevealId(1)));

        for _ in 0..5 {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            match event {
                EngineEvent::RevealTick { reveal, chunk } => {
                    assert_eq!(reveal, RevealId(1));
                    assert!((1..=4).contains(&chunk));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_new_reveal_replaces_old_timer() {
        let (mut runner, _rx) = Runner::new(Arc::new(Echo), fast_reveal());
        runner.execute(vec![Command::StartReveal {
            reveal: RevealId(1),
        }]);
        runner.execute(vec![Command::StartReveal {
            reveal: RevealId(2),
        }]);
        assert_eq!(runner.active_reveal(), Some(RevealId(2)));

        // Cancelling a stale id leaves the live timer alone.
        runner.execute(vec![Command::CancelReveal {
            reveal: RevealId(1),
        }]);
        assert_eq!(runner.active_reveal(), Some(RevealId(2)));

        runner.execute(vec![Command::CancelReveal {
            reveal: RevealId(2),
        }]);
        assert_eq!(runner.active_reveal(), None);
    }

    #[tokio::test]
    async fn test_dropped_timer_stops_ticking() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = RevealTimer::start(RevealId(3), fast_reveal(), tx);
        drop(timer);
        // Give the aborted task a chance to be torn down, then drain.
        tokio::time::sleep(Duration::from_millis(20)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }
}
