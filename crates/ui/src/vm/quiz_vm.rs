use services::{
    QuizEvent, QuizLoopService, QuizPhase, QuizServiceError, QuizSnapshot, SessionContext,
};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SubmitName(String),
    Choose(usize),
    Back,
    SaveAndNext,
    Tick,
    Restart,
    RetrySave,
}

/// Owns the session context for the lifetime of the quiz screen.
#[derive(Debug)]
pub struct QuizVm {
    ctx: SessionContext,
}

impl QuizVm {
    #[must_use]
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn phase(&self) -> Option<QuizPhase> {
        self.ctx.session().map(quiz_core::QuizSession::phase)
    }

    /// Whether the countdown should be ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase() == Some(QuizPhase::InProgress)
    }

    #[must_use]
    pub fn snapshot(&self, quiz_loop: &QuizLoopService) -> Option<QuizSnapshot> {
        quiz_loop.snapshot(&self.ctx)
    }

    /// # Errors
    ///
    /// Returns `ViewError::SaveFailed` when a retried save fails again,
    /// `ViewError::LoadFailed` when a restart cannot reload the questions,
    /// and `ViewError::Unknown` for other service failures.
    pub async fn apply(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<(), ViewError> {
        let event = match intent {
            QuizIntent::RetrySave => {
                return quiz_loop
                    .retry_save(&mut self.ctx)
                    .await
                    .map(|_| ())
                    .map_err(map_service_error);
            }
            QuizIntent::SubmitName(name) => QuizEvent::SubmitName(name),
            QuizIntent::Choose(index) => QuizEvent::Select(index),
            QuizIntent::Back => QuizEvent::Back,
            QuizIntent::SaveAndNext => QuizEvent::SaveAndNext,
            QuizIntent::Tick => QuizEvent::Tick,
            QuizIntent::Restart => QuizEvent::Restart,
        };

        quiz_loop
            .dispatch(&mut self.ctx, event)
            .await
            .map(|_| ())
            .map_err(map_service_error)
    }
}

/// # Errors
///
/// Returns `ViewError::LoadFailed` when the questions cannot be loaded.
pub async fn start_quiz(quiz_loop: &QuizLoopService) -> Result<QuizVm, ViewError> {
    let mut ctx = SessionContext::new();
    quiz_loop.start(&mut ctx).await.map_err(map_service_error)?;
    Ok(QuizVm::new(ctx))
}

fn map_service_error(err: QuizServiceError) -> ViewError {
    tracing::warn!(error = %err, "quiz action failed");
    match err {
        QuizServiceError::Load(_) => ViewError::LoadFailed,
        QuizServiceError::Persistence(_) => ViewError::SaveFailed,
        _ => ViewError::Unknown,
    }
}
