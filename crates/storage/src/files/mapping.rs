use csv::StringRecord;
use quiz_core::model::{Question, QuestionError};
use serde::Deserialize;

/// Header names a question file must carry, in any order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "question",
    "option1",
    "option2",
    "option3",
    "option4",
    "correct_answer",
];

/// One CSV row as stored on disk. Extra columns are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionRow {
    question: String,
    option1: String,
    option2: String,
    option3: String,
    option4: String,
    correct_answer: String,
}

impl QuestionRow {
    pub(crate) fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            self.question,
            [self.option1, self.option2, self.option3, self.option4],
            self.correct_answer,
        )
    }
}

/// Required columns absent from `headers`, in canonical order.
pub(crate) fn missing_columns(headers: &StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|required| (*required).to_owned())
        .collect()
}
