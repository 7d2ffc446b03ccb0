//! Answer comparison and scoring.

use crate::model::Quiz;

/// Case-insensitive, whitespace-trimmed comparison of a chosen option
/// against the expected answer.
#[must_use]
pub fn is_correct(chosen: &str, correct: &str) -> bool {
    chosen.trim().to_lowercase() == correct.trim().to_lowercase()
}

/// Count correct answers across the whole quiz.
///
/// Always recomputed from scratch; unanswered and out-of-range entries
/// count as wrong.
#[must_use]
pub fn score(quiz: &Quiz, answers: &[Option<usize>]) -> u32 {
    let correct = quiz
        .iter()
        .zip(answers)
        .filter(|(question, answer)| answer.is_some_and(|idx| question.is_correct_option(idx)))
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}
