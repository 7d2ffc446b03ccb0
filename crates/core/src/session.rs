//! The quiz progression state machine.
//!
//! A [`QuizSession`] is advanced only through [`QuizSession::apply`], which
//! takes one [`QuizEvent`] plus the current wall-clock time and reports what
//! happened as a [`Transition`]. Time is never observed in the background:
//! every event (including the periodic `Tick`) first checks whether the
//! current question's countdown has run out.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    OPTION_COUNT, Question, Quiz, QuizSettings, ResultRecord, TimeoutFill, TimeoutFinish,
};
use crate::scoring;
use crate::time::elapsed_secs;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz is not finished")]
    NotFinished,
}

/// Non-fatal reasons an event was refused. The session is left as it was
/// (apart from any answer recorded before the check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    EmptyName,
    InvalidOption { index: usize },
    NoSelection,
    /// 1-based numbers of the questions still unanswered.
    UnansweredQuestions { missing: Vec<usize> },
}

impl ValidationWarning {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::EmptyName => "Please enter your name to begin.".to_owned(),
            Self::InvalidOption { index } => format!("Option {} does not exist.", index + 1),
            Self::NoSelection => "Please choose an answer first.".to_owned(),
            Self::UnansweredQuestions { missing } => {
                let list = missing
                    .iter()
                    .map(|n| format!("Q{n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Please answer all questions before finishing ({list}).")
            }
        }
    }
}

//
// ─── EVENTS & TRANSITIONS ──────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingName,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    SubmitName(String),
    /// Choose an option on the current question without saving it.
    Select(usize),
    Back,
    SaveAndNext,
    /// Re-evaluate the countdown only.
    Tick,
    Restart,
}

/// What followed an expired countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterTimeout {
    Advanced { to: usize },
    Finished { score: u32, total: u32 },
    /// Strict finishing refused to end the quiz and moved to an unanswered question.
    Blocked { to: usize, warning: ValidationWarning },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event had no effect in the current phase.
    Unchanged,
    Started,
    Selected { index: usize },
    MovedBack { to: usize },
    Advanced { to: usize },
    TimedOut {
        question: usize,
        /// Whether the timeout recorded an answer for the question.
        filled: bool,
        then: AfterTimeout,
    },
    Finished { score: u32, total: u32 },
    Rejected(ValidationWarning),
    Restarted,
}

/// Read-only progress summary for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizProgress {
    /// 1-based number of the current question.
    pub number: usize,
    pub total: usize,
    pub answered: usize,
    /// `number / total`, in `(0, 1]`.
    pub fraction: f32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Mutable state of one interactive attempt.
///
/// `answers` and `drafts` always have one slot per question. A draft is an
/// explicit but unsaved choice; the on-screen default (option 0) is neither
/// a draft nor an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    quiz: Quiz,
    settings: QuizSettings,
    phase: QuizPhase,
    current: usize,
    score: u32,
    answers: Vec<Option<usize>>,
    drafts: Vec<Option<usize>>,
    user_name: String,
    question_started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Fresh session awaiting a name. Intended to be created through a
    /// session context, which guarantees one session per interactive run.
    #[must_use]
    pub fn new(quiz: Quiz, settings: QuizSettings, now: DateTime<Utc>) -> Self {
        let len = quiz.len();
        Self {
            quiz,
            settings,
            phase: QuizPhase::AwaitingName,
            current: 0,
            score: 0,
            answers: vec![None; len],
            drafts: vec![None; len],
            user_name: String::new(),
            question_started_at: now,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress => self.quiz.get(self.current),
            QuizPhase::AwaitingName | QuizPhase::Finished => None,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.quiz.len()
    }

    /// Final score. Zero until the session is finished.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub fn question_started_at(&self) -> DateTime<Utc> {
        self.question_started_at
    }

    /// Seconds left on the current question's countdown. May be zero or
    /// negative once expired; the next event will act on it.
    #[must_use]
    pub fn time_left(&self, now: DateTime<Utc>) -> i64 {
        i64::from(self.settings.time_limit_secs()) - elapsed_secs(self.question_started_at, now)
    }

    /// The option to show as selected: the draft, else the saved answer,
    /// else option 0 when pre-selection is enabled.
    #[must_use]
    pub fn displayed_selection(&self) -> Option<usize> {
        self.drafts[self.current]
            .or(self.answers[self.current])
            .or_else(|| self.settings.preselect_first_option().then_some(0))
    }

    /// Whether the user explicitly chose or saved something for the current question.
    #[must_use]
    pub fn has_explicit_selection(&self) -> bool {
        self.drafts[self.current].is_some() || self.answers[self.current].is_some()
    }

    /// 1-based numbers of unanswered questions.
    #[must_use]
    pub fn unanswered(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| answer.is_none())
            .map(|(i, _)| i + 1)
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total();
        let number = self.current + 1;
        #[allow(clippy::cast_precision_loss)]
        let fraction = number as f32 / total as f32;
        QuizProgress {
            number,
            total,
            answered: self.answers.iter().filter(|a| a.is_some()).count(),
            fraction,
        }
    }

    /// Review of a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the quiz has ended.
    pub fn result_record(&self) -> Result<ResultRecord, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        Ok(ResultRecord::from_answers(
            self.user_name.clone(),
            &self.quiz,
            &self.answers,
        ))
    }

    /// Apply one event at wall-clock time `now`.
    ///
    /// While in progress an expired countdown takes precedence: the timeout
    /// transition runs and the event itself is dropped.
    pub fn apply(&mut self, event: QuizEvent, now: DateTime<Utc>) -> Transition {
        if event == QuizEvent::Restart {
            self.reset(now);
            return Transition::Restarted;
        }

        match self.phase {
            QuizPhase::AwaitingName => match event {
                QuizEvent::SubmitName(name) => self.start(&name, now),
                _ => Transition::Unchanged,
            },
            QuizPhase::InProgress => {
                if let Some(timed_out) = self.check_timeout(now) {
                    return timed_out;
                }
                match event {
                    QuizEvent::Select(index) => self.select(index),
                    QuizEvent::Back => self.back(now),
                    QuizEvent::SaveAndNext => self.save_and_next(now),
                    QuizEvent::SubmitName(_) | QuizEvent::Tick | QuizEvent::Restart => {
                        Transition::Unchanged
                    }
                }
            }
            QuizPhase::Finished => Transition::Unchanged,
        }
    }

    fn start(&mut self, name: &str, now: DateTime<Utc>) -> Transition {
        let name = name.trim();
        if name.is_empty() {
            return Transition::Rejected(ValidationWarning::EmptyName);
        }
        self.user_name = name.to_owned();
        self.question_started_at = now;
        self.phase = QuizPhase::InProgress;
        Transition::Started
    }

    fn select(&mut self, index: usize) -> Transition {
        if index >= OPTION_COUNT {
            return Transition::Rejected(ValidationWarning::InvalidOption { index });
        }
        self.drafts[self.current] = Some(index);
        Transition::Selected { index }
    }

    fn back(&mut self, now: DateTime<Utc>) -> Transition {
        if self.current == 0 {
            return Transition::Unchanged;
        }
        self.current -= 1;
        self.question_started_at = now;
        Transition::MovedBack { to: self.current }
    }

    fn save_and_next(&mut self, now: DateTime<Utc>) -> Transition {
        let idx = self.current;
        let selection = self.drafts[idx]
            .or(self.answers[idx])
            .or_else(|| self.settings.preselect_first_option().then_some(0));
        let Some(choice) = selection else {
            return Transition::Rejected(ValidationWarning::NoSelection);
        };

        self.answers[idx] = Some(choice);
        self.drafts[idx] = None;

        if idx < self.quiz.last_index() {
            self.advance_to(idx + 1, now);
            return Transition::Advanced { to: self.current };
        }

        let missing = self.unanswered();
        if !missing.is_empty() {
            return Transition::Rejected(ValidationWarning::UnansweredQuestions { missing });
        }
        let (score, total) = self.finish();
        Transition::Finished { score, total }
    }

    fn check_timeout(&mut self, now: DateTime<Utc>) -> Option<Transition> {
        if self.time_left(now) > 0 {
            return None;
        }

        let question = self.current;
        let filled = self.answers[question].is_none()
            && self.settings.timeout_fill() == TimeoutFill::FirstOption;
        if filled {
            self.answers[question] = Some(0);
            self.drafts[question] = None;
        }

        let then = if question < self.quiz.last_index() {
            self.advance_to(question + 1, now);
            AfterTimeout::Advanced { to: self.current }
        } else {
            let missing = self.unanswered();
            match (self.settings.timeout_finish(), missing.first().copied()) {
                (TimeoutFinish::Strict, Some(first)) => {
                    self.advance_to(first - 1, now);
                    AfterTimeout::Blocked {
                        to: self.current,
                        warning: ValidationWarning::UnansweredQuestions { missing },
                    }
                }
                _ => {
                    let (score, total) = self.finish();
                    AfterTimeout::Finished { score, total }
                }
            }
        };

        Some(Transition::TimedOut {
            question,
            filled,
            then,
        })
    }

    fn advance_to(&mut self, index: usize, now: DateTime<Utc>) {
        self.current = index;
        self.question_started_at = now;
    }

    fn finish(&mut self) -> (u32, u32) {
        self.score = scoring::score(&self.quiz, &self.answers);
        self.phase = QuizPhase::Finished;
        (self.score, u32::try_from(self.quiz.len()).unwrap_or(u32::MAX))
    }

    fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(self.quiz.clone(), self.settings, now);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
