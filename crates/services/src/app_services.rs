use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::question_store::QuestionStore;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services with the question file already loaded.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    question_count: usize,
}

impl AppServices {
    /// Build services backed by a CSV question file and a results directory.
    ///
    /// The questions are loaded eagerly so a bad file fails startup instead
    /// of the first render.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Load` if the question file cannot be loaded.
    pub async fn new_files(
        questions_path: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::files(questions_path, results_dir), clock, settings).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::Load` if the question source cannot be loaded.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let questions = Arc::new(QuestionStore::new(Arc::clone(&storage.questions)));
        let quiz = questions.quiz().await?;

        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            settings,
            questions,
            Arc::clone(&storage.results),
        ));

        Ok(Self {
            quiz_loop,
            question_count: quiz.len(),
        })
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}
