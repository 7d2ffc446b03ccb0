use crate::model::quiz::Quiz;
use crate::scoring;

/// Label used wherever a question has no recorded answer.
pub const NOT_ANSWERED: &str = "Not Answered";

/// One reviewed question in a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question: String,
    /// Text of the chosen option, `None` when unanswered.
    pub chosen: Option<String>,
    pub correct: bool,
    pub correct_answer: String,
}

impl ResultEntry {
    /// The chosen text, or [`NOT_ANSWERED`].
    #[must_use]
    pub fn chosen_label(&self) -> &str {
        self.chosen.as_deref().unwrap_or(NOT_ANSWERED)
    }
}

/// The derived outcome of an attempt, ready to render or persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    user_name: String,
    score: u32,
    total: u32,
    entries: Vec<ResultEntry>,
}

impl ResultRecord {
    /// Build the record from raw answers. The score is recomputed here from
    /// the answers rather than trusted from the caller.
    #[must_use]
    pub fn from_answers(user_name: impl Into<String>, quiz: &Quiz, answers: &[Option<usize>]) -> Self {
        let entries: Vec<ResultEntry> = quiz
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let chosen = answers
                    .get(i)
                    .copied()
                    .flatten()
                    .and_then(|idx| question.option(idx))
                    .map(str::to_owned);
                let correct = chosen
                    .as_deref()
                    .is_some_and(|text| scoring::is_correct(text, question.correct_answer()));
                ResultEntry {
                    number: i + 1,
                    question: question.text().to_owned(),
                    chosen,
                    correct,
                    correct_answer: question.correct_answer().to_owned(),
                }
            })
            .collect();

        Self {
            user_name: user_name.into(),
            score: scoring::score(quiz, answers),
            total: u32::try_from(quiz.len()).unwrap_or(u32::MAX),
            entries,
        }
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }
}
