use std::ops::Index;
use std::sync::Arc;

use thiserror::Error;

use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    Empty,
}

/// The ordered, immutable question list for a run.
///
/// Cloning is cheap: questions are shared behind an `Arc`, so the loader
/// cache and every session point at the same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    questions: Arc<[Question]>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// Number of questions. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl Index<usize> for Quiz {
    type Output = Question;

    fn index(&self, index: usize) -> &Self::Output {
        &self.questions[index]
    }
}
