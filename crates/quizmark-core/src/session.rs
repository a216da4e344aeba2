//! Quiz session state machine.
//!
//! Owns the question set, the current answer key, the countdown timer, and
//! the one-shot finalize latch. One session covers a single
//! generate-answer-score-reset cycle; the session token distinguishes
//! in-flight work from a superseded session.

use thiserror::Error;

use crate::model::{AnswerKey, Choice, Question, QuizResult};
use crate::parser::{self, ParseError};
use crate::scoring;

pub const DEFAULT_FROM: u32 = 1;
pub const DEFAULT_TO: u32 = 5;
pub const MIN_TIMER_MINUTES: u32 = 1;
pub const MAX_TIMER_MINUTES: u32 = 200;

/// Seconds remaining at which the single low-time warning fires.
const WARNING_THRESHOLD_SECS: u32 = 10;

/// A recoverable session-state failure. Prior state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("'from' question {from} is greater than 'to' question {to}")]
    InvalidRange { from: u32, to: u32 },

    #[error("timer must be between {MIN_TIMER_MINUTES} and {MAX_TIMER_MINUTES} minutes, got {0}")]
    TimerOutOfRange(u32),

    #[error("question {0} is not in the current range")]
    UnknownQuestion(u32),

    #[error("session already finalized; reset or regenerate to score again")]
    AlreadyFinalized,
}

/// What happened on a one-second timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Normal countdown step.
    Tick { remaining_secs: u32 },
    /// Fired once per timer run when little time remains.
    Warning { remaining_secs: u32 },
    /// The countdown reached zero; the session was finalized if it had not
    /// been already.
    Expired,
}

#[derive(Debug, Clone)]
struct Countdown {
    remaining_secs: u32,
    total_secs: u32,
    paused: bool,
    warned: bool,
}

/// One generate-answer-score-reset cycle.
#[derive(Debug, Clone)]
pub struct QuizSession {
    from: u32,
    to: u32,
    questions: Vec<Question>,
    key: AnswerKey,
    result: Option<QuizResult>,
    timer: Option<Countdown>,
    token: u64,
}

impl QuizSession {
    /// A fresh session with the default question range already generated.
    pub fn new() -> Self {
        let mut session = Self {
            from: DEFAULT_FROM,
            to: DEFAULT_TO,
            questions: Vec::new(),
            key: AnswerKey::new(),
            result: None,
            timer: None,
            token: 0,
        };
        session.populate(DEFAULT_FROM, DEFAULT_TO);
        session
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_ids(&self) -> Vec<u32> {
        self.questions.iter().map(|q| q.id).collect()
    }

    pub fn answer_key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Monotonically increasing token identifying the current session.
    ///
    /// In-flight recommendation responses carry the token they were issued
    /// under; a stale token means the response must be discarded.
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.token == token
    }

    /// Generate a fresh contiguous question range, superseding any previous
    /// questions and result.
    ///
    /// Rejected before any state mutation when `from > to`.
    pub fn generate(&mut self, from: u32, to: u32) -> Result<(), SessionError> {
        if from > to {
            return Err(SessionError::InvalidRange { from, to });
        }
        self.from = from;
        self.to = to;
        self.populate(from, to);
        tracing::debug!(from, to, token = self.token, "generated question range");
        Ok(())
    }

    /// Select or deselect the user's answer for a question.
    ///
    /// Refused once a result has been computed; the scored snapshot must not
    /// drift from the questions it was computed over.
    pub fn answer(&mut self, question_id: u32, choice: Option<Choice>) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadyFinalized);
        }
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        question.user_answer = choice;
        Ok(())
    }

    /// Mark the correct answer for a single question directly.
    pub fn mark_correct(&mut self, question_id: u32, choice: Choice) -> Result<(), SessionError> {
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        self.key.insert(question_id, choice);
        Ok(())
    }

    /// Bulk-apply answer-key text.
    ///
    /// Atomic: on any parse failure the stored key is left unchanged.
    pub fn apply_key_text(&mut self, raw: &str) -> Result<(), ParseError> {
        let ids = self.question_ids();
        let key = parser::parse_answer_key(raw, &ids)?;
        self.key = key;
        Ok(())
    }

    /// Score the session, once.
    ///
    /// Both the manual trigger and timer expiry route through this latch, so
    /// a session can never be scored twice.
    pub fn finalize(&mut self) -> Result<&QuizResult, SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadyFinalized);
        }
        let result = scoring::score(&self.questions, &self.key);
        self.timer = None;
        tracing::info!(
            correct = result.correct_count,
            incorrect = result.incorrect_count,
            unanswered = result.unanswered_count,
            accuracy = result.accuracy,
            "session finalized"
        );
        Ok(self.result.insert(result))
    }

    /// Restore defaults and regenerate the default range.
    ///
    /// Bumps the session token, invalidating any in-flight recommendation
    /// request issued under the previous one.
    pub fn reset(&mut self) {
        self.from = DEFAULT_FROM;
        self.to = DEFAULT_TO;
        self.timer = None;
        self.populate(DEFAULT_FROM, DEFAULT_TO);
        tracing::debug!(token = self.token, "session reset");
    }

    /// Start (or restart) the countdown.
    pub fn start_timer(&mut self, minutes: u32) -> Result<(), SessionError> {
        if !(MIN_TIMER_MINUTES..=MAX_TIMER_MINUTES).contains(&minutes) {
            return Err(SessionError::TimerOutOfRange(minutes));
        }
        let total_secs = minutes * 60;
        self.timer = Some(Countdown {
            remaining_secs: total_secs,
            total_secs,
            paused: false,
            warned: false,
        });
        Ok(())
    }

    pub fn pause_timer(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.paused = true;
        }
    }

    pub fn resume_timer(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.paused = false;
        }
    }

    pub fn timer_remaining_secs(&self) -> Option<u32> {
        self.timer.as_ref().map(|t| t.remaining_secs)
    }

    pub fn timer_total_secs(&self) -> Option<u32> {
        self.timer.as_ref().map(|t| t.total_secs)
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `None` when no timer is running or it is paused. Expiry
    /// finalizes the session through the one-shot latch, so a manual
    /// finalize that already happened is never repeated.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        let timer = self.timer.as_mut()?;
        if timer.paused {
            return None;
        }

        timer.remaining_secs = timer.remaining_secs.saturating_sub(1);
        let remaining = timer.remaining_secs;

        if remaining == 0 {
            self.timer = None;
            if self.result.is_none() {
                // Latch is clear; timer expiry is the one scoring trigger.
                let result = scoring::score(&self.questions, &self.key);
                self.result = Some(result);
                tracing::info!("countdown expired, session finalized");
            }
            return Some(TimerEvent::Expired);
        }

        if remaining <= WARNING_THRESHOLD_SECS && !timer.warned {
            timer.warned = true;
            return Some(TimerEvent::Warning {
                remaining_secs: remaining,
            });
        }

        Some(TimerEvent::Tick {
            remaining_secs: remaining,
        })
    }

    fn populate(&mut self, from: u32, to: u32) {
        self.questions = (from..=to).map(Question::new).collect();
        self.key = AnswerKey::new();
        self.result = None;
        self.token += 1;
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
