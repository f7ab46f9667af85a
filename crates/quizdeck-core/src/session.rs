//! Quiz session state machine.
//!
//! [`QuizSession`] is synchronous and owns no timers. Events that depend on
//! time (the countdown tick and the delayed advance after an answer) are
//! delivered by the caller; [`crate::runtime`] does this on a tokio task.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::FlattenedQuestion;

/// Default quiz-wide time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;
/// Default delay between answering and moving to the next question.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);
/// Default countdown tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Timing configuration for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seconds on the clock when the quiz starts.
    pub time_limit_secs: u32,
    /// Delay between an answer and the advance to the next question.
    pub advance_delay: Duration,
    /// Period of the countdown tick.
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Observable state of a quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Index into the flattened question list.
    pub current_index: usize,
    /// Correct answers so far.
    pub score: u32,
    /// Seconds remaining on the quiz-wide clock.
    pub time_left_secs: u32,
    pub has_started: bool,
    pub is_finished: bool,
    /// The option chosen for the current question, if any.
    pub selected_option: Option<String>,
}

impl SessionState {
    /// The state of a fresh session.
    pub fn initial(time_limit_secs: u32) -> Self {
        Self {
            current_index: 0,
            score: 0,
            time_left_secs: time_limit_secs,
            has_started: false,
            is_finished: false,
            selected_option: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.has_started {
            Phase::NotStarted
        } else if self.is_finished {
            Phase::Finished
        } else {
            Phase::Active
        }
    }
}

/// Lifecycle phase derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Active,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "not started"),
            Phase::Active => write!(f, "active"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// A delayed advance scheduled by [`QuizSession::select_option`].
///
/// Deliver it back through [`QuizSession::advance`] once `delay` has elapsed.
/// A token is honored only while it is the session's pending advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    question_index: usize,
    /// How long to wait before delivering the advance.
    pub delay: Duration,
}

impl ScheduledAdvance {
    /// The question this advance moves away from.
    pub fn question_index(&self) -> usize {
        self.question_index
    }
}

/// Handle returned by [`QuizSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&SessionState) + Send>;

/// Final outcome of a finished quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub session_id: Uuid,
    pub score: u32,
    /// Number of questions in the quiz.
    pub total: usize,
    /// Number of questions that received an answer.
    pub answered: usize,
    /// Whether the clock ran out before every question was answered.
    pub timed_out: bool,
    pub finished_at: DateTime<Utc>,
}

/// The quiz session state machine.
pub struct QuizSession {
    id: Uuid,
    questions: Arc<[FlattenedQuestion]>,
    config: SessionConfig,
    state: SessionState,
    pending_advance: Option<usize>,
    answered: usize,
    finished_at: Option<DateTime<Utc>>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions", &self.questions.len())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pending_advance", &self.pending_advance)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl QuizSession {
    pub fn new(questions: Arc<[FlattenedQuestion]>, config: SessionConfig) -> Self {
        let state = SessionState::initial(config.time_limit_secs);
        Self {
            id: Uuid::new_v4(),
            questions,
            config,
            state,
            pending_advance: None,
            answered: 0,
            finished_at: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Identifier of the current run. A restart begins a new run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn questions(&self) -> &Arc<[FlattenedQuestion]> {
        &self.questions
    }

    /// The question at the current index, if the index is in range.
    pub fn current_question(&self) -> Option<&FlattenedQuestion> {
        self.questions.get(self.state.current_index)
    }

    /// Whether the countdown should be running.
    pub fn clock_running(&self) -> bool {
        self.phase() == Phase::Active
    }

    /// The advance waiting to be delivered, if any.
    pub fn pending_advance(&self) -> Option<ScheduledAdvance> {
        self.pending_advance.map(|question_index| ScheduledAdvance {
            question_index,
            delay: self.config.advance_delay,
        })
    }

    /// Register a callback invoked after every committed transition.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&SessionState) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Begin the quiz and start the clock.
    ///
    /// Ignored unless the session is not started and has questions.
    pub fn start(&mut self) {
        if self.phase() != Phase::NotStarted {
            tracing::debug!(phase = %self.phase(), "start ignored");
            return;
        }
        if self.questions.is_empty() {
            tracing::warn!("start ignored: no questions loaded");
            return;
        }
        self.state.has_started = true;
        self.state.time_left_secs = self.config.time_limit_secs;
        tracing::debug!(session = %self.id, questions = self.questions.len(), "quiz started");
        self.notify();
    }

    /// Count the clock down by one second. Reaching zero finishes the quiz.
    pub fn tick(&mut self) {
        if self.phase() != Phase::Active {
            return;
        }
        if self.state.time_left_secs > 0 {
            self.state.time_left_secs -= 1;
        }
        if self.state.time_left_secs == 0 {
            tracing::debug!(session = %self.id, index = self.state.current_index, "time is up");
            self.finish();
        }
        self.notify();
    }

    /// Answer the current question.
    ///
    /// Only the first selection per question counts; later ones return `None`.
    /// On success the caller must deliver the returned advance after its delay.
    pub fn select_option(&mut self, option: &str) -> Option<ScheduledAdvance> {
        if self.phase() != Phase::Active || self.state.selected_option.is_some() {
            return None;
        }
        let correct = self.current_question()?.is_correct(option);

        self.state.selected_option = Some(option.to_string());
        if correct {
            self.state.score += 1;
        }
        self.answered += 1;
        self.pending_advance = Some(self.state.current_index);
        tracing::debug!(
            index = self.state.current_index,
            correct,
            score = self.state.score,
            "option selected"
        );
        self.notify();
        self.pending_advance()
    }

    /// Move past the answered question, or finish if it was the last one.
    ///
    /// Stale tokens (after a timeout or restart) are ignored.
    pub fn advance(&mut self, token: ScheduledAdvance) {
        if self.phase() != Phase::Active || self.pending_advance != Some(token.question_index) {
            tracing::debug!(index = token.question_index, "stale advance ignored");
            return;
        }
        self.pending_advance = None;
        if self.state.current_index + 1 < self.questions.len() {
            self.state.current_index += 1;
            self.state.selected_option = None;
        } else {
            tracing::debug!(session = %self.id, score = self.state.score, "all questions answered");
            self.finish();
        }
        self.notify();
    }

    /// Return a finished session to its initial state. Questions are kept.
    pub fn restart(&mut self) {
        if self.phase() != Phase::Finished {
            tracing::debug!(phase = %self.phase(), "restart ignored");
            return;
        }
        self.state = SessionState::initial(self.config.time_limit_secs);
        self.pending_advance = None;
        self.answered = 0;
        self.finished_at = None;
        self.id = Uuid::new_v4();
        tracing::debug!(session = %self.id, "quiz restarted");
        self.notify();
    }

    /// The outcome of the run, once finished.
    pub fn result(&self) -> Option<QuizResult> {
        let finished_at = self.finished_at?;
        Some(QuizResult {
            session_id: self.id,
            score: self.state.score,
            total: self.questions.len(),
            answered: self.answered,
            timed_out: self.state.time_left_secs == 0,
            finished_at,
        })
    }

    fn finish(&mut self) {
        self.state.is_finished = true;
        self.pending_advance = None;
        self.finished_at = Some(Utc::now());
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer(&self.state);
        }
    }
}
