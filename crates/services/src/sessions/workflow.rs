use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::QuizSettings;
use quiz_core::session::AfterTimeout;
use quiz_core::{QuizEvent, Transition, ValidationWarning};
use storage::ResultSink;

use super::context::{SaveState, SessionContext};
use super::view::QuizSnapshot;
use crate::Clock;
use crate::error::QuizServiceError;
use crate::question_store::QuestionStore;

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub transition: Transition,
    pub is_finished: bool,
    /// Set on the event that finished the quiz (and after a restart, cleared).
    pub save: Option<SaveState>,
}

/// Orchestrates session start, event dispatch and result persistence.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    questions: Arc<QuestionStore>,
    results: Arc<dyn ResultSink>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        questions: Arc<QuestionStore>,
        results: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            clock,
            settings,
            questions,
            results,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Make sure `ctx` holds a session. Existing sessions are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Load` if the questions cannot be loaded.
    pub async fn start(&self, ctx: &mut SessionContext) -> Result<(), QuizServiceError> {
        if ctx.is_initialized() {
            return Ok(());
        }
        let quiz = self.questions.quiz().await?;
        ctx.initialize(quiz, self.settings, self.clock.now());
        Ok(())
    }

    /// Apply `event` at the service clock's current time.
    ///
    /// # Errors
    ///
    /// See [`Self::dispatch_at`].
    pub async fn dispatch(
        &self,
        ctx: &mut SessionContext,
        event: QuizEvent,
    ) -> Result<LoopOutcome, QuizServiceError> {
        self.dispatch_at(ctx, event, self.clock.now()).await
    }

    /// Apply `event` at `now`, persisting the result when the quiz finishes.
    ///
    /// `Restart` destroys the session and creates a fresh one. A failed save
    /// does not fail the dispatch: it is reported in `LoopOutcome::save` and
    /// can be retried with [`Self::retry_save`].
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotStarted` if `ctx` has no session, or
    /// `QuizServiceError::Load` if a restart cannot reload the questions.
    pub async fn dispatch_at(
        &self,
        ctx: &mut SessionContext,
        event: QuizEvent,
        now: DateTime<Utc>,
    ) -> Result<LoopOutcome, QuizServiceError> {
        if event == QuizEvent::Restart {
            return self.restart_at(ctx, now).await;
        }

        let session = ctx.session_mut().ok_or(QuizServiceError::NotStarted)?;
        let was_finished = session.is_finished();
        let transition = session.apply(event, now);
        let is_finished = session.is_finished();

        log_transition(&transition);
        // A warning stays on screen until something actually changes.
        if transition != Transition::Unchanged {
            ctx.set_warning(warning_of(&transition));
        }

        if is_finished && !was_finished {
            self.persist(ctx).await?;
        }

        Ok(LoopOutcome {
            transition,
            is_finished,
            save: ctx.save_state().cloned(),
        })
    }

    /// Destroy the current session and start a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Load` if the questions cannot be loaded.
    pub async fn restart(&self, ctx: &mut SessionContext) -> Result<LoopOutcome, QuizServiceError> {
        self.restart_at(ctx, self.clock.now()).await
    }

    async fn restart_at(
        &self,
        ctx: &mut SessionContext,
        now: DateTime<Utc>,
    ) -> Result<LoopOutcome, QuizServiceError> {
        ctx.teardown();
        let quiz = self.questions.quiz().await?;
        ctx.initialize(quiz, self.settings, now);
        tracing::info!("quiz restarted");
        Ok(LoopOutcome {
            transition: Transition::Restarted,
            is_finished: false,
            save: None,
        })
    }

    /// Write the result again after a failed save. Returns the existing path
    /// if the result is already saved.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotStarted` without a session,
    /// `QuizServiceError::Session` if the quiz is not finished, or
    /// `QuizServiceError::Persistence` if writing fails again.
    pub async fn retry_save(&self, ctx: &mut SessionContext) -> Result<PathBuf, QuizServiceError> {
        if let Some(path) = ctx.saved_path() {
            return Ok(path.clone());
        }
        let record = ctx
            .session()
            .ok_or(QuizServiceError::NotStarted)?
            .result_record()?;
        match self.results.save_result(&record).await {
            Ok(path) => {
                ctx.set_save(SaveState::Saved(path.clone()));
                Ok(path)
            }
            Err(err) => {
                tracing::error!(error = %err, "retrying result save failed");
                ctx.set_save(SaveState::Failed(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Read-only view of `ctx` at the service clock's current time.
    #[must_use]
    pub fn snapshot(&self, ctx: &SessionContext) -> Option<QuizSnapshot> {
        QuizSnapshot::capture(ctx, self.clock.now())
    }

    async fn persist(&self, ctx: &mut SessionContext) -> Result<(), QuizServiceError> {
        let record = ctx
            .session()
            .ok_or(QuizServiceError::NotStarted)?
            .result_record()?;
        let state = match self.results.save_result(&record).await {
            Ok(path) => SaveState::Saved(path),
            Err(err) => {
                tracing::error!(error = %err, "failed to save quiz result");
                SaveState::Failed(err.to_string())
            }
        };
        ctx.set_save(state);
        Ok(())
    }
}

impl std::fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("questions", &self.questions)
            .finish_non_exhaustive()
    }
}

fn warning_of(transition: &Transition) -> Option<ValidationWarning> {
    match transition {
        Transition::Rejected(warning)
        | Transition::TimedOut {
            then: AfterTimeout::Blocked { warning, .. },
            ..
        } => Some(warning.clone()),
        _ => None,
    }
}

fn log_transition(transition: &Transition) {
    match transition {
        Transition::Started => tracing::info!("quiz started"),
        Transition::Finished { score, total } => {
            tracing::info!(score, total, "quiz finished");
        }
        Transition::TimedOut {
            question,
            filled,
            then,
        } => tracing::info!(question, filled, ?then, "question timed out"),
        Transition::Rejected(warning) => tracing::warn!(?warning, "event rejected"),
        other => tracing::debug!(transition = ?other, "quiz transition"),
    }
}
