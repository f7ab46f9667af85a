//! Session runtime.
//!
//! Runs a [`QuizSession`] on a single tokio task. User intents, the countdown
//! tick, and the delayed advance are all serialized through one select loop,
//! so the state machine never needs a lock. Timers live only as long as the
//! state machine wants them: the tick interval exists while the quiz is
//! active, and the advance sleep while an advance is pending.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior, Sleep};

use crate::model::FlattenedQuestion;
use crate::session::{QuizResult, QuizSession, ScheduledAdvance, SessionConfig, SessionState};

#[derive(Debug)]
enum Command {
    Start,
    Select(String),
    Restart,
    Shutdown,
}

/// Handle to a running quiz session.
///
/// Dropping the handle tears the session down and cancels its timers.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SessionState>,
    result: watch::Receiver<Option<QuizResult>>,
    questions: Arc<[FlattenedQuestion]>,
    task: Option<JoinHandle<()>>,
}

/// Spawn a session over `questions` on the current tokio runtime.
pub fn spawn_session(questions: Arc<[FlattenedQuestion]>, config: SessionConfig) -> SessionHandle {
    let mut session = QuizSession::new(Arc::clone(&questions), config);

    let (state_tx, state_rx) = watch::channel(session.state().clone());
    session.subscribe(move |state| {
        state_tx.send_replace(state.clone());
    });
    let (result_tx, result_rx) = watch::channel(None);
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(drive(session, commands_rx, result_tx));

    SessionHandle {
        commands: commands_tx,
        state: state_rx,
        result: result_rx,
        questions,
        task: Some(task),
    }
}

impl SessionHandle {
    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn select_option(&self, option: impl Into<String>) {
        self.send(Command::Select(option.into()));
    }

    pub fn restart(&self) {
        self.send(Command::Restart);
    }

    /// The most recently committed state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The question for the most recently committed state.
    pub fn current_question(&self) -> Option<&FlattenedQuestion> {
        let index = self.state.borrow().current_index;
        self.questions.get(index)
    }

    pub fn questions(&self) -> &Arc<[FlattenedQuestion]> {
        &self.questions
    }

    /// The outcome of the last finished run, cleared on restart.
    pub fn result(&self) -> Option<QuizResult> {
        self.result.borrow().clone()
    }

    /// Wait for the next committed transition and return the new state.
    ///
    /// Returns `None` once the session has been torn down.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Stop the session and wait for its task to exit.
    pub async fn shutdown(mut self) {
        self.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("session task ended abnormally: {e}");
            }
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("session already shut down");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

async fn drive(
    mut session: QuizSession,
    mut commands: mpsc::UnboundedReceiver<Command>,
    result: watch::Sender<Option<QuizResult>>,
) {
    let mut ticker: Option<Interval> = None;
    let mut advance: Option<(ScheduledAdvance, Pin<Box<Sleep>>)> = None;

    loop {
        // Reconcile timers with the state machine before waiting again.
        if session.clock_running() {
            if ticker.is_none() {
                let period = session.config().tick_interval;
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker = Some(interval);
            }
        } else if ticker.take().is_some() {
            tracing::debug!("countdown cancelled");
        }
        if advance.is_some() && session.pending_advance().is_none() {
            advance = None;
            tracing::debug!("pending advance cancelled");
        }
        result.send_if_modified(|current| {
            let latest = session.result();
            if *current != latest {
                *current = latest;
                true
            } else {
                false
            }
        });

        tokio::select! {
            command = commands.recv() => match command {
                None | Some(Command::Shutdown) => break,
                Some(Command::Start) => session.start(),
                Some(Command::Select(option)) => {
                    if let Some(token) = session.select_option(&option) {
                        advance = Some((token, Box::pin(tokio::time::sleep(token.delay))));
                    }
                }
                Some(Command::Restart) => session.restart(),
            },
            _ = next_tick(&mut ticker) => session.tick(),
            token = advance_due(&mut advance) => {
                advance = None;
                session.advance(token);
            }
        }
    }

    tracing::debug!(session = %session.id(), "session torn down");
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

async fn advance_due(
    advance: &mut Option<(ScheduledAdvance, Pin<Box<Sleep>>)>,
) -> ScheduledAdvance {
    match advance {
        Some((token, sleep)) => {
            sleep.as_mut().await;
            *token
        }
        None => pending().await,
    }
}
