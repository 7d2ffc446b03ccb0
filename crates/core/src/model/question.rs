use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every question offers exactly this many choices.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Options are kept verbatim and in source order. The correct answer is
/// stored as text and compared against the chosen option with
/// [`crate::scoring::is_correct`], so it does not have to match an option
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer: String,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank, or
    /// `QuestionError::EmptyCorrectAnswer` if the correct answer is blank.
    pub fn new(
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }

        Ok(Self {
            text,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Option text at `index`, if in range.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Whether the option at `index` matches the correct answer.
    ///
    /// Out-of-range indexes are never correct.
    #[must_use]
    pub fn is_correct_option(&self, index: usize) -> bool {
        self.option(index)
            .is_some_and(|chosen| crate::scoring::is_correct(chosen, &self.correct_answer))
    }
}
