use std::sync::Arc;

use quiz_core::model::Quiz;
use storage::{LoadError, QuestionSource};
use tokio::sync::OnceCell;

/// Process-wide cache in front of a question source.
///
/// The first successful load is kept for the life of the store; later calls
/// return the same quiz without touching the source. A failed load is not
/// cached, so the next call tries again.
pub struct QuestionStore {
    source: Arc<dyn QuestionSource>,
    cached: OnceCell<Quiz>,
}

impl QuestionStore {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            cached: OnceCell::new(),
        }
    }

    /// # Errors
    ///
    /// Returns `LoadError` if the source cannot be loaded.
    pub async fn quiz(&self) -> Result<Quiz, LoadError> {
        let quiz = self
            .cached
            .get_or_try_init(|| async {
                let quiz = self.source.load_quiz().await?;
                tracing::debug!(questions = quiz.len(), "question cache filled");
                Ok::<_, LoadError>(quiz)
            })
            .await?;
        Ok(quiz.clone())
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cached.initialized()
    }
}

impl std::fmt::Debug for QuestionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionStore")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
